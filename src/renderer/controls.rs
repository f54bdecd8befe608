use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::config::ControlsConfig;
use crate::renderer::camera::PerspectiveCamera;

const POLE_EPSILON: f32 = 1e-6;
const DOLLY_BASE: f32 = 0.95;

/// Spherical coordinates around the Y axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Spherical {
    radius: f32,
    /// Polar angle from +Y.
    phi: f32,
    /// Azimuth around Y, measured from +Z.
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Orbit-style camera controls with optional damping.
///
/// Input handlers only accumulate deltas; `update` applies them to the camera.
/// With damping enabled every update consumes `damping_factor` of the pending
/// rotation and pan, so motion eases out over several frames.
pub struct OrbitControls {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    spherical_delta: Spherical,
    pan_offset: Vec3,
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::from_config(&ControlsConfig::default())
    }
}

impl OrbitControls {
    pub fn from_config(config: &ControlsConfig) -> Self {
        Self {
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            pan_speed: config.pan_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,

            spherical_delta: Spherical::default(),
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }

    /// Pointer drag in logical pixels; `viewport_height` normalizes the angle.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.spherical_delta.theta -= TAU * delta.x / height * self.rotate_speed;
        self.spherical_delta.phi -= TAU * delta.y / height * self.rotate_speed;
    }

    pub fn pan(&mut self, delta: Vec2, viewport_height: f32, camera: &PerspectiveCamera) {
        let offset = camera.position - camera.target;
        let target_distance = offset.length() * (camera.fov.to_radians() / 2.0).tan();
        let height = viewport_height.max(1.0);

        let view = camera.view_matrix().inverse();
        let right = view.x_axis.truncate();
        let up = view.y_axis.truncate();

        let left = -2.0 * delta.x * target_distance / height * self.pan_speed;
        let upward = 2.0 * delta.y * target_distance / height * self.pan_speed;
        self.pan_offset += right * left + up * upward;
    }

    /// Positive `steps` moves the camera towards the target.
    pub fn dolly(&mut self, steps: f32) {
        if steps == 0.0 {
            return;
        }
        self.scale *= DOLLY_BASE.powf(self.zoom_speed * steps);
    }

    #[cfg(test)]
    pub fn is_settled(&self) -> bool {
        self.spherical_delta.theta.abs() < 1e-6
            && self.spherical_delta.phi.abs() < 1e-6
            && self.pan_offset.length_squared() < 1e-12
            && self.scale == 1.0
    }

    /// Advances the camera one step.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        let offset = camera.position - camera.target;
        let mut spherical = Spherical::from_offset(offset);

        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        spherical.theta += self.spherical_delta.theta * factor;
        spherical.phi += self.spherical_delta.phi * factor;
        spherical.phi = spherical.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);
        spherical.radius =
            (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        camera.target += self.pan_offset * factor;
        camera.position = camera.target + spherical.to_offset();

        if self.enable_damping {
            self.spherical_delta.theta *= 1.0 - self.damping_factor;
            self.spherical_delta.phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        camera.position = Vec3::new(25.0, 25.0, 3.0);
        camera
    }

    #[test]
    fn spherical_round_trip() {
        let offset = Vec3::new(25.0, 25.0, 3.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert_relative_eq!(back.x, offset.x, epsilon = 1e-4);
        assert_relative_eq!(back.y, offset.y, epsilon = 1e-4);
        assert_relative_eq!(back.z, offset.z, epsilon = 1e-4);
    }

    #[test]
    fn idle_update_keeps_camera_still() {
        let mut controls = OrbitControls::default();
        let mut camera = camera();
        let before = camera.position;

        controls.update(&mut camera);
        assert_relative_eq!(camera.position.distance(before), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn damped_rotation_decays_and_keeps_distance() {
        let mut controls = OrbitControls::default();
        let mut camera = camera();
        let distance = camera.position.distance(camera.target);

        controls.rotate(Vec2::new(120.0, 0.0), 600.0);
        let pending = controls.spherical_delta.theta;

        controls.update(&mut camera);
        assert_relative_eq!(
            controls.spherical_delta.theta,
            pending * (1.0 - controls.damping_factor),
            epsilon = 1e-6
        );

        for _ in 0..500 {
            controls.update(&mut camera);
        }
        assert!(controls.is_settled());
        assert_relative_eq!(
            camera.position.distance(camera.target),
            distance,
            epsilon = 1e-2
        );
    }

    #[test]
    fn undamped_rotation_applies_immediately() {
        let mut controls = OrbitControls::default();
        controls.enable_damping = false;
        let mut camera = camera();

        let before = camera.position;

        controls.rotate(Vec2::new(50.0, 0.0), 600.0);
        controls.update(&mut camera);
        assert!(camera.position.distance(before) > 1e-2);
        assert!(controls.is_settled());
    }

    #[test]
    fn dolly_respects_distance_limits() {
        let mut controls = OrbitControls::default();
        let mut camera = camera();

        controls.dolly(-500.0);
        controls.update(&mut camera);
        assert_relative_eq!(
            camera.position.distance(camera.target),
            controls.max_distance,
            epsilon = 1e-3
        );

        controls.dolly(500.0);
        controls.update(&mut camera);
        assert_relative_eq!(
            camera.position.distance(camera.target),
            controls.min_distance,
            epsilon = 1e-3
        );
    }

    #[test]
    fn polar_angle_never_flips_over_the_pole() {
        let mut controls = OrbitControls::default();
        controls.enable_damping = false;
        let mut camera = camera();

        controls.rotate(Vec2::new(0.0, 10_000.0), 600.0);
        controls.update(&mut camera);
        assert!(camera.position.y > camera.target.y);
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let mut controls = OrbitControls::default();
        controls.enable_damping = false;
        let mut camera = camera();
        let offset = camera.position - camera.target;

        controls.pan(Vec2::new(40.0, 0.0), 600.0, &camera);
        controls.update(&mut camera);

        assert!(camera.target.length() > 0.0);
        let new_offset = camera.position - camera.target;
        assert_relative_eq!(new_offset.length(), offset.length(), epsilon = 1e-3);
    }
}

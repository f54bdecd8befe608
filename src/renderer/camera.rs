use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,

    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            fov,
            aspect,
            near,
            far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self::new(config.fov, aspect, config.near, config.far);
        camera.position = Vec3::from_array(config.position);
        camera.target = Vec3::from_array(config.target);
        camera
    }

    /// Must be called after changing fov, aspect, near or far.
    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl MeshUniform {
    pub fn new(model: Mat4, color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_is_cached_until_updated() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        let before = camera.projection_matrix();

        camera.aspect = 2.0;
        assert_eq!(camera.projection_matrix(), before);

        camera.update_projection_matrix();
        assert_ne!(camera.projection_matrix(), before);
        approx::assert_relative_eq!(
            camera.projection_matrix().x_axis.x * 2.0,
            before.x_axis.x,
            epsilon = 1e-5
        );
    }
}

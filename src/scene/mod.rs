pub mod geometry;
pub mod material;
pub mod mesh;
pub mod store;

use crate::anim::Tween;
use crate::config::{AppConfig, SpinConfig};
use crate::renderer::{OrbitControls, PerspectiveCamera, Viewport};
use crate::ui::bindings::{Field, OnChange, Value, binding};

use geometry::{TorusKnotParams, torus_knot};
use material::{Color, Material};
use mesh::{MaterialSlot, MeshGroup};
use store::{GeometryId, GeometryStore};

/// All mutable application state, owned in one place and handed to the
/// panel, the resize handler and the frame loop.
pub struct SceneContext {
    pub group: MeshGroup,
    pub solid_material: Material,
    pub wireframe_material: Material,
    pub geometries: GeometryStore,

    /// Snapshot the current geometry was built from.
    pub params: TorusKnotParams,
    /// Color picker value; copied into the solid material on change.
    pub color: Color,

    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub viewport: Viewport,

    spin: SpinConfig,
    spin_tween: Option<Tween>,
    last_elapsed: Option<f32>,
}

impl SceneContext {
    pub fn new(config: &AppConfig, viewport: Viewport) -> Self {
        let mut geometries = GeometryStore::new();
        let params = config.torus_knot;
        let geometry = geometries.insert(torus_knot(&params));

        Self {
            group: MeshGroup::new(geometry),
            solid_material: Material::solid(config.materials.color),
            wireframe_material: Material::wireframe(config.materials.wireframe_color),
            geometries,

            params,
            color: config.materials.color,

            camera: PerspectiveCamera::from_config(&config.camera, viewport.aspect()),
            controls: OrbitControls::from_config(&config.controls),
            viewport,

            spin: config.spin.clone(),
            spin_tween: None,
            last_elapsed: None,
        }
    }

    pub fn material(&self, slot: MaterialSlot) -> &Material {
        match slot {
            MaterialSlot::Solid => &self.solid_material,
            MaterialSlot::Wireframe => &self.wireframe_material,
        }
    }

    /// Replaces the geometry of both meshes with one built from `params` and
    /// releases whatever they referenced before. Each old buffer is released
    /// once, whether or not the meshes shared it.
    pub fn rebuild(&mut self, params: TorusKnotParams) {
        self.params = params;
        let buffer = torus_knot(&params);
        let (vertices, indices) = (buffer.vertex_count(), buffer.indices.len());
        let fresh = self.geometries.insert(buffer);

        let mut stale: Vec<GeometryId> = self
            .group
            .meshes()
            .iter()
            .map(|mesh| mesh.geometry)
            .collect();
        stale.sort();
        stale.dedup();

        self.group.solid.geometry = fresh;
        self.group.wireframe.geometry = fresh;

        for id in stale {
            self.geometries.release(id);
        }

        log::debug!(
            "Rebuilt torus knot: {vertices} vertices, {indices} indices ({} live, {} released)",
            self.geometries.live_count(),
            self.geometries.released_total()
        );
    }

    pub fn read(&self, field: Field) -> Value {
        match field {
            Field::Visible => Value::Bool(self.group.visible),
            Field::Wireframe => Value::Bool(self.wireframe_material.wireframe),
            Field::Color => Value::Color(self.color),
            Field::Spin => Value::Trigger,
            Field::Radius => Value::Number(self.params.radius),
            Field::Tube => Value::Number(self.params.tube),
            Field::TubularSegments => Value::Number(self.params.tubular_segments),
            Field::RadialSegments => Value::Number(self.params.radial_segments),
        }
    }

    /// Writes a panel value and runs the binding's change hook.
    /// Values of the wrong kind for the field are ignored.
    pub fn apply(&mut self, field: Field, value: Value) {
        let binding = binding(field);
        let value = binding.constrain(value);
        let mut params = self.params;

        match (field, value) {
            (Field::Visible, Value::Bool(v)) => self.group.visible = v,
            (Field::Wireframe, Value::Bool(v)) => self.wireframe_material.wireframe = v,
            (Field::Color, Value::Color(c)) => self.color = c,
            (Field::Spin, Value::Trigger) => {}
            (Field::Radius, Value::Number(v)) => params.radius = v,
            (Field::Tube, Value::Number(v)) => params.tube = v,
            (Field::TubularSegments, Value::Number(v)) => params.tubular_segments = v,
            (Field::RadialSegments, Value::Number(v)) => params.radial_segments = v,
            (field, value) => {
                log::warn!("Ignoring {value:?} for {field:?}");
                return;
            }
        }

        match binding.on_change {
            OnChange::Nothing => {}
            OnChange::ApplyColor => self.solid_material.color = self.color,
            OnChange::Spin => self.spin(),
            OnChange::RebuildGeometry => self.rebuild(params),
        }
    }

    /// Starts a rotation of the group around Y by the configured amount.
    /// A spin already in flight is replaced, starting from the current angle.
    pub fn spin(&mut self) {
        let from = self.group.rotation.y;
        self.spin_tween = Some(Tween::new(
            from,
            from + self.spin.amount,
            self.spin.duration,
            self.spin.ease.easing(),
        ));
    }

    #[cfg(test)]
    pub fn is_spinning(&self) -> bool {
        self.spin_tween.is_some()
    }

    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) -> bool {
        self.viewport
            .resize(width, height, device_pixel_ratio, &mut self.camera)
    }

    /// One frame of animation at `elapsed` seconds since the loop started.
    pub fn tick(&mut self, elapsed: f32) {
        let dt = self
            .last_elapsed
            .map_or(0.0, |last| (elapsed - last).max(0.0));
        self.last_elapsed = Some(elapsed);

        if let Some(tween) = &mut self.spin_tween {
            self.group.rotation.y = tween.advance(dt);
            if tween.is_finished() {
                self.spin_tween = None;
            }
        }

        self.group.rotation.x = elapsed.sin();

        self.controls.update(&mut self.camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn context() -> SceneContext {
        SceneContext::new(&AppConfig::default(), Viewport::new(800, 600, 1.0))
    }

    #[test]
    fn startup_shares_one_geometry() {
        let scene = context();
        assert_eq!(scene.group.solid.geometry, scene.group.wireframe.geometry);
        assert_eq!(scene.geometries.live_count(), 1);
        assert_eq!(scene.solid_material.color, Color::from_rgb(217, 134, 26));
        assert!(scene.wireframe_material.wireframe);
        assert!(scene.wireframe_material.transparent);
    }

    #[test]
    fn rebuild_swaps_both_meshes_and_releases_once() {
        let mut scene = context();
        let old = scene.group.solid.geometry;

        let params = TorusKnotParams {
            radius: 15.0,
            tube: 4.5,
            tubular_segments: 128.0,
            radial_segments: 12.0,
        };
        scene.rebuild(params);

        let fresh = scene.group.solid.geometry;
        assert_ne!(fresh, old);
        assert_eq!(scene.group.wireframe.geometry, fresh);
        assert!(!scene.geometries.is_live(old));
        assert_eq!(scene.geometries.released_total(), 1);
        assert_eq!(scene.geometries.drain_released(), vec![old]);
        assert_eq!(scene.geometries.live_count(), 1);
        assert_eq!(scene.geometries.get(fresh), Some(&torus_knot(&params)));
    }

    #[test]
    fn rebuild_releases_unshared_buffers_individually() {
        let mut scene = context();
        let shared = scene.group.solid.geometry;
        let extra = scene.geometries.insert(torus_knot(&TorusKnotParams::default()));
        scene.group.wireframe.geometry = extra;

        scene.rebuild(TorusKnotParams::default());

        let mut released = scene.geometries.drain_released();
        released.sort();
        assert_eq!(released, vec![shared, extra]);
        assert_eq!(scene.geometries.released_total(), 2);
        assert_eq!(scene.geometries.live_count(), 1);
    }

    #[test]
    fn displayed_geometry_follows_snapshot() {
        let mut scene = context();
        let steps = [
            (Field::Radius, 12.0),
            (Field::Tube, 2.5),
            (Field::TubularSegments, 200.0),
            (Field::RadialSegments, 7.5),
        ];
        for (field, value) in steps {
            scene.apply(field, Value::Number(value));
            let current = scene.geometries.get(scene.group.solid.geometry).unwrap();
            assert_eq!(current, &torus_knot(&scene.params));
        }
        assert_eq!(scene.params.radius, 12.0);
        assert_eq!(scene.geometries.released_total(), steps.len());
        assert_eq!(scene.geometries.live_count(), 1);
    }

    #[test]
    fn slider_values_are_clamped() {
        let mut scene = context();
        scene.apply(Field::TubularSegments, Value::Number(1000.0));
        assert_eq!(scene.params.tubular_segments, 400.0);
    }

    #[test]
    fn visible_touches_only_visibility() {
        let mut scene = context();
        let group = scene.group.clone();
        let solid = scene.solid_material;
        let wire = scene.wireframe_material;
        let params = scene.params;

        scene.apply(Field::Visible, Value::Bool(false));

        assert!(!scene.group.visible);
        assert_eq!(
            MeshGroup {
                visible: true,
                ..scene.group.clone()
            },
            group
        );
        assert_eq!(scene.solid_material, solid);
        assert_eq!(scene.wireframe_material, wire);
        assert_eq!(scene.params, params);

        scene.apply(Field::Visible, Value::Bool(true));
        assert!(scene.group.visible);
    }

    #[test]
    fn wireframe_toggle_targets_wireframe_material() {
        let mut scene = context();
        scene.apply(Field::Wireframe, Value::Bool(false));
        assert!(!scene.wireframe_material.wireframe);
        assert!(!scene.solid_material.wireframe);
        assert_eq!(scene.read(Field::Wireframe), Value::Bool(false));
    }

    #[test]
    fn color_applies_to_solid_material_only() {
        let mut scene = context();
        let wire_color = scene.wireframe_material.color;

        scene.apply(Field::Color, Value::Color("rgb(0,0,0)".parse().unwrap()));

        assert_eq!(scene.solid_material.color, Color::from_rgb(0, 0, 0));
        assert_eq!(scene.color, Color::from_rgb(0, 0, 0));
        assert_eq!(scene.wireframe_material.color, wire_color);
    }

    #[test]
    fn mismatched_value_is_ignored() {
        let mut scene = context();
        scene.apply(Field::Visible, Value::Number(1.0));
        assert!(scene.group.visible);
        assert_eq!(scene.geometries.released_total(), 0);
    }

    #[test]
    fn rotation_x_is_sine_of_elapsed_time() {
        let mut scene = context();
        for t in [0.0_f32, 0.5, 3.0, 1.25, 100.0] {
            scene.tick(t);
            assert_relative_eq!(scene.group.rotation.x, t.sin(), epsilon = 1e-6);
        }
    }

    #[test]
    fn spin_reaches_target_over_one_second() {
        let mut scene = context();
        scene.group.rotation.z = 0.4;
        scene.tick(0.0);
        let start_y = scene.group.rotation.y;

        scene.apply(Field::Spin, Value::Trigger);
        assert!(scene.is_spinning());

        scene.tick(0.5);
        let midway = scene.group.rotation.y;
        assert!(midway > start_y && midway < start_y + 10.0);
        assert_relative_eq!(scene.group.rotation.x, 0.5_f32.sin(), epsilon = 1e-6);
        assert_eq!(scene.group.rotation.z, 0.4);

        scene.tick(1.0);
        assert_relative_eq!(scene.group.rotation.y, start_y + 10.0);
        assert!(!scene.is_spinning());

        scene.tick(2.0);
        assert_relative_eq!(scene.group.rotation.y, start_y + 10.0);
        assert_eq!(scene.group.rotation.z, 0.4);
    }

    #[test]
    fn second_spin_restarts_from_current_angle() {
        let mut scene = context();
        scene.tick(0.0);
        scene.spin();
        scene.tick(0.5);
        let midway = scene.group.rotation.y;

        scene.spin();
        scene.tick(1.5);
        scene.tick(2.5);
        assert_relative_eq!(scene.group.rotation.y, midway + 10.0, epsilon = 1e-4);
    }

    #[test]
    fn resize_goes_through_viewport() {
        let mut scene = context();
        assert!(scene.resize(1024, 512, 2.5));
        assert_relative_eq!(scene.camera.aspect, 2.0);
        assert_eq!(scene.viewport.pixel_ratio, 2.0);
        assert_eq!(scene.viewport.drawing_buffer_size(), (2048, 1024));
    }
}

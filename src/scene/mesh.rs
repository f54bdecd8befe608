use glam::{EulerRot, Mat4, Vec3};

use crate::scene::store::GeometryId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialSlot {
    Solid,
    Wireframe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mesh {
    pub geometry: GeometryId,
    pub material: MaterialSlot,
}

/// The torus knot: a solid mesh and its wireframe overlay, transformed together.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGroup {
    pub solid: Mesh,
    pub wireframe: Mesh,
    pub visible: bool,
    pub rotation: Vec3,
}

impl MeshGroup {
    pub fn new(geometry: GeometryId) -> Self {
        Self {
            solid: Mesh {
                geometry,
                material: MaterialSlot::Solid,
            },
            wireframe: Mesh {
                geometry,
                material: MaterialSlot::Wireframe,
            },
            visible: true,
            rotation: Vec3::ZERO,
        }
    }

    pub fn meshes(&self) -> [&Mesh; 2] {
        [&self.solid, &self.wireframe]
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }
}

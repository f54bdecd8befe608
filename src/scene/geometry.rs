use std::f32::consts::TAU;

use glam::Vec3;

const KNOT_P: f32 = 2.0;
const KNOT_Q: f32 = 3.0;

/// The four dimensions a torus knot is built from.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TorusKnotParams {
    pub radius: f32,
    pub tube: f32,
    pub tubular_segments: f32,
    pub radial_segments: f32,
}

impl Default for TorusKnotParams {
    fn default() -> Self {
        Self {
            radius: 10.0,
            tube: 3.0,
            tubular_segments: 64.0,
            radial_segments: 8.0,
        }
    }
}

impl TorusKnotParams {
    /// Segment counts are whole numbers; fractional slider values are floored.
    pub fn segment_counts(&self) -> (u32, u32) {
        (
            self.tubular_segments.floor().max(1.0) as u32,
            self.radial_segments.floor().max(1.0) as u32,
        )
    }
}

/// Triangle mesh data. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuffer {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl GeometryBuffer {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Every triangle edge as a line segment, for wireframe drawing.
    pub fn line_indices(&self) -> Vec<u32> {
        self.indices
            .chunks_exact(3)
            .flat_map(|tri| [tri[0], tri[1], tri[1], tri[2], tri[2], tri[0]])
            .collect()
    }
}

fn position_on_curve(u: f32, radius: f32) -> Vec3 {
    let cu = u.cos();
    let su = u.sin();
    let qu_over_p = KNOT_Q / KNOT_P * u;
    let cs = qu_over_p.cos();

    Vec3::new(
        radius * (2.0 + cs) * 0.5 * cu,
        radius * (2.0 + cs) * su * 0.5,
        radius * qu_over_p.sin() * 0.5,
    )
}

pub fn torus_knot(params: &TorusKnotParams) -> GeometryBuffer {
    let (tubular, radial) = params.segment_counts();
    let rows = tubular as usize + 1;
    let cols = radial as usize + 1;

    let mut vertices = Vec::with_capacity(rows * cols * 3);

    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * KNOT_P * TAU;

        let p1 = position_on_curve(u, params.radius);
        let p2 = position_on_curve(u + 0.01, params.radius);

        let tangent = p2 - p1;
        let mut normal = p2 + p1;
        let binormal = tangent.cross(normal).normalize();
        normal = binormal.cross(tangent).normalize();

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let cx = -params.tube * v.cos();
            let cy = params.tube * v.sin();

            let vertex = p1 + normal * cx + binormal * cy;
            vertices.extend_from_slice(&vertex.to_array());
        }
    }

    let mut indices = Vec::with_capacity(tubular as usize * radial as usize * 6);
    let stride = radial + 1;
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;

            indices.extend_from_slice(&[a, b, d]);
            indices.extend_from_slice(&[b, c, d]);
        }
    }

    GeometryBuffer { vertices, indices }
}

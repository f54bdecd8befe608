use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::scene::geometry::GeometryBuffer;
use crate::scene::store::{GeometryId, GeometryStore};

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

/// Regroups the flat `[x, y, z, ...]` positions of `geometry` into vertices.
pub fn vertices(geometry: &GeometryBuffer) -> Vec<Vertex> {
    geometry
        .vertices
        .chunks_exact(3)
        .map(|p| Vertex {
            position: [p[0], p[1], p[2]],
        })
        .collect()
}

/// Device-side copy of one `GeometryBuffer`.
pub struct GpuGeometry {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub line_index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub line_index_count: u32,
}

impl GpuGeometry {
    pub fn new(device: &wgpu::Device, geometry: &GeometryBuffer) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Knot Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices(geometry)),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Knot Index Buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let line_indices = geometry.line_indices();
        let line_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Knot Line Index Buffer"),
            contents: bytemuck::cast_slice(&line_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            line_index_buffer,
            index_count: geometry.indices.len() as u32,
            line_index_count: line_indices.len() as u32,
        }
    }

    fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.line_index_buffer.destroy();
    }
}

/// Mirrors the live geometries of a `GeometryStore` on the GPU.
#[derive(Default)]
pub struct MeshBuffers {
    uploaded: HashMap<GeometryId, GpuGeometry>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroys buffers of released geometries and uploads any the store
    /// holds that are not on the device yet.
    pub fn sync(&mut self, device: &wgpu::Device, store: &mut GeometryStore, wanted: &[GeometryId]) {
        for id in store.drain_released() {
            if let Some(gpu) = self.uploaded.remove(&id) {
                gpu.destroy();
            }
        }

        for &id in wanted {
            if self.uploaded.contains_key(&id) {
                continue;
            }
            if let Some(geometry) = store.get(id) {
                self.uploaded.insert(id, GpuGeometry::new(device, geometry));
            }
        }
    }

    pub fn get(&self, id: GeometryId) -> Option<&GpuGeometry> {
        self.uploaded.get(&id)
    }
}

pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::geometry::{TorusKnotParams, torus_knot};

    #[test]
    fn vertices_follow_flat_positions() {
        let geometry = torus_knot(&TorusKnotParams::default());
        let vertices = vertices(&geometry);

        assert_eq!(vertices.len(), geometry.vertex_count());
        let second = [geometry.vertices[3], geometry.vertices[4], geometry.vertices[5]];
        assert_eq!(vertices[1].position, second);
        assert_eq!(
            bytemuck::cast_slice::<Vertex, u8>(&vertices).len(),
            vertices.len() * vertex_layout().array_stride as usize
        );
    }
}

use std::sync::Arc;

use winit::window::Window;

use crate::renderer::camera::{CameraUniform, MeshUniform, PerspectiveCamera};
use crate::renderer::mesh_buffers::{MeshBuffers, vertex_layout};
use crate::scene::SceneContext;
use crate::scene::material::Material;
use crate::scene::mesh::{MaterialSlot, Mesh};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to acquire GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Which pipeline a mesh is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineKind {
    Solid,
    /// Filled pass drawn over a surface already in the depth buffer.
    SolidOverlay,
    Wireframe,
}

impl PipelineKind {
    fn select(slot: MaterialSlot, material: &Material) -> Self {
        match (material.wireframe, slot) {
            (true, _) => PipelineKind::Wireframe,
            (false, MaterialSlot::Solid) => PipelineKind::Solid,
            (false, MaterialSlot::Wireframe) => PipelineKind::SolidOverlay,
        }
    }

    fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            PipelineKind::Solid | PipelineKind::SolidOverlay => {
                wgpu::PrimitiveTopology::TriangleList
            }
            PipelineKind::Wireframe => wgpu::PrimitiveTopology::LineList,
        }
    }

    // The overlay shares the solid mesh's vertices, so it must pass on equal depth.
    fn depth_compare(self) -> wgpu::CompareFunction {
        match self {
            PipelineKind::Solid => wgpu::CompareFunction::Less,
            PipelineKind::SolidOverlay | PipelineKind::Wireframe => {
                wgpu::CompareFunction::LessEqual
            }
        }
    }

    fn label(self) -> &'static str {
        match self {
            PipelineKind::Solid => "Solid Render Pipeline",
            PipelineKind::SolidOverlay => "Solid Overlay Render Pipeline",
            PipelineKind::Wireframe => "Wireframe Render Pipeline",
        }
    }
}

struct MeshSlot {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct GpuState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,

    pipeline_solid: wgpu::RenderPipeline,
    pipeline_overlay: wgpu::RenderPipeline,
    pipeline_wireframe: wgpu::RenderPipeline,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    solid_slot: MeshSlot,
    wireframe_slot: MeshSlot,

    pub mesh_buffers: MeshBuffers,

    depth_texture: wgpu::TextureView,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    kind: PipelineKind,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(kind.label()),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: kind.topology(),
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: kind.depth_compare(),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_mesh_slot(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
) -> MeshSlot {
    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<MeshUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });

    MeshSlot {
        uniform_buffer,
        bind_group,
    }
}

fn uniform_layout_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl GpuState {
    /// `size` is the drawing buffer size in physical pixels.
    pub async fn new(window: Arc<Window>, size: (u32, u32)) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.0.max(1),
            height: size.1.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Knot Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[uniform_layout_entry()],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let mesh_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Mesh Bind Group Layout"),
                entries: &[uniform_layout_entry()],
            });

        let solid_slot = create_mesh_slot(&device, &mesh_bind_group_layout, "Solid Mesh Uniform");
        let wireframe_slot =
            create_mesh_slot(&device, &mesh_bind_group_layout, "Wireframe Mesh Uniform");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Knot Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &mesh_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline_solid = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            PipelineKind::Solid,
        );
        let pipeline_overlay = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            PipelineKind::SolidOverlay,
        );
        let pipeline_wireframe = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            PipelineKind::Wireframe,
        );

        let depth_texture = Self::create_depth_texture(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline_solid,
            pipeline_overlay,
            pipeline_wireframe,
            camera_buffer,
            camera_bind_group,
            solid_slot,
            wireframe_slot,
            mesh_buffers: MeshBuffers::new(),
            depth_texture,
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, (width, height): (u32, u32)) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Self::create_depth_texture(&self.device, &self.config);
        }
    }

    pub fn reconfigure(&mut self) {
        self.resize((self.config.width, self.config.height));
    }

    fn pipeline(&self, kind: PipelineKind) -> &wgpu::RenderPipeline {
        match kind {
            PipelineKind::Solid => &self.pipeline_solid,
            PipelineKind::SolidOverlay => &self.pipeline_overlay,
            PipelineKind::Wireframe => &self.pipeline_wireframe,
        }
    }

    fn slot(&self, slot: MaterialSlot) -> &MeshSlot {
        match slot {
            MaterialSlot::Solid => &self.solid_slot,
            MaterialSlot::Wireframe => &self.wireframe_slot,
        }
    }

    /// Uploads geometry changes and per-frame uniforms for `scene`.
    pub fn prepare(&mut self, scene: &mut SceneContext) {
        let wanted = [scene.group.solid.geometry, scene.group.wireframe.geometry];
        self.mesh_buffers
            .sync(&self.device, &mut scene.geometries, &wanted);

        self.update_camera(&scene.camera);

        let model = scene.group.model_matrix();
        for mesh in scene.group.meshes() {
            let material = scene.material(mesh.material);
            let uniform = MeshUniform::new(model, material.rgba());
            self.queue.write_buffer(
                &self.slot(mesh.material).uniform_buffer,
                0,
                bytemuck::cast_slice(&[uniform]),
            );
        }
    }

    fn update_camera(&self, camera: &PerspectiveCamera) {
        let uniform = CameraUniform::from_camera(camera);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    pub fn render_scene(
        &self,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        scene: &SceneContext,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if !scene.group.visible {
            return;
        }

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        for mesh in scene.group.meshes() {
            self.draw_mesh(&mut render_pass, scene, mesh);
        }
    }

    fn draw_mesh(&self, render_pass: &mut wgpu::RenderPass<'_>, scene: &SceneContext, mesh: &Mesh) {
        let Some(geometry) = self.mesh_buffers.get(mesh.geometry) else {
            return;
        };
        let material = scene.material(mesh.material);

        render_pass.set_bind_group(1, &self.slot(mesh.material).bind_group, &[]);
        render_pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));

        let kind = PipelineKind::select(mesh.material, material);
        render_pass.set_pipeline(self.pipeline(kind));

        if kind == PipelineKind::Wireframe {
            render_pass.set_index_buffer(
                geometry.line_index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            render_pass.draw_indexed(0..geometry.line_index_count, 0, 0..1);
        } else {
            render_pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..geometry.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::Color;

    #[test]
    fn overlay_pipeline_passes_on_equal_depth() {
        let color = Color::from_rgb(77, 46, 0);
        let mut overlay = Material::wireframe(color);

        let kind = PipelineKind::select(MaterialSlot::Wireframe, &overlay);
        assert_eq!(kind, PipelineKind::Wireframe);
        assert_eq!(kind.topology(), wgpu::PrimitiveTopology::LineList);
        assert_eq!(kind.depth_compare(), wgpu::CompareFunction::LessEqual);

        overlay.wireframe = false;
        let kind = PipelineKind::select(MaterialSlot::Wireframe, &overlay);
        assert_eq!(kind, PipelineKind::SolidOverlay);
        assert_eq!(kind.topology(), wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(kind.depth_compare(), wgpu::CompareFunction::LessEqual);
    }

    #[test]
    fn solid_mesh_uses_strict_depth() {
        let solid = Material::solid(Color::from_rgb(217, 134, 26));
        let kind = PipelineKind::select(MaterialSlot::Solid, &solid);
        assert_eq!(kind, PipelineKind::Solid);
        assert_eq!(kind.depth_compare(), wgpu::CompareFunction::Less);
    }
}

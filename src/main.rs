use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use glam::Vec2;

mod anim;
mod config;
mod renderer;
mod scene;
mod ui;

use anim::{Clock, FrameTiming};
use config::AppConfig;
use renderer::{GpuState, Viewport};
use scene::SceneContext;
use ui::{apply_theme, draw_debug_panel, draw_help_overlay};

#[derive(Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Rotate,
    Pan,
}

#[derive(Default)]
struct InputState {
    drag: Option<DragMode>,
    /// Cursor position in logical pixels.
    cursor: Option<Vec2>,
}

struct App {
    config: AppConfig,

    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    egui_ctx: egui::Context,

    scene: Option<SceneContext>,
    input: InputState,

    clock: Clock,
    timing: FrameTiming,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            config,

            window: None,
            gpu: None,
            egui_state: None,
            egui_renderer: None,
            egui_ctx: egui::Context::default(),

            scene: None,
            input: InputState::default(),

            clock: Clock::new(),
            timing: FrameTiming::new(Instant::now()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn std::error::Error>> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let scale_factor = window.scale_factor();
        let logical = window.inner_size().to_logical::<f64>(scale_factor);
        let viewport = Viewport::new(
            logical.width.round() as u32,
            logical.height.round() as u32,
            scale_factor as f32,
        );

        let gpu = pollster::block_on(GpuState::new(
            window.clone(),
            viewport.drawing_buffer_size(),
        ))?;

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            self.egui_ctx.viewport_id(),
            &window,
            Some(scale_factor as f32),
            None,
            Some(2048),
        );

        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);

        apply_theme(&self.egui_ctx);

        log::info!(
            "Viewport {}x{} @ {:.2}x",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );

        self.scene = Some(SceneContext::new(&self.config, viewport));
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);
        self.clock = Clock::new();

        Ok(())
    }

    fn handle_resize(&mut self) {
        let (Some(window), Some(scene), Some(gpu)) = (&self.window, &mut self.scene, &mut self.gpu)
        else {
            return;
        };

        let scale_factor = window.scale_factor();
        let logical = window.inner_size().to_logical::<f64>(scale_factor);
        if scene.resize(
            logical.width.round() as u32,
            logical.height.round() as u32,
            scale_factor as f32,
        ) {
            gpu.resize(scene.viewport.drawing_buffer_size());
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        if let Some(fps) = self.timing.record_frame(now) {
            if let Some(window) = &self.window {
                window.set_title(&format!("{} - {:.0} fps", self.config.window.title, fps));
            }
        }

        if let Some(scene) = &mut self.scene {
            scene.tick(self.clock.elapsed_time());
        }
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(egui_state), Some(scene)) =
            (&self.window, &mut self.egui_state, &mut self.scene)
        else {
            return;
        };

        let raw_input = egui_state.take_egui_input(window);

        let distance = scene.camera.position.distance(scene.camera.target);
        let fps = self.timing.fps();
        let mut events = Vec::new();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            events = draw_debug_panel(ctx, scene);
            draw_help_overlay(ctx, distance, fps);
        });

        for event in events {
            scene.apply(event.field, event.value);
        }

        let Some(gpu) = &mut self.gpu else { return };
        let Some(egui_renderer) = &mut self.egui_renderer else {
            return;
        };

        egui_state.handle_platform_output(window, full_output.platform_output);

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                gpu.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory");
                event_loop.exit();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.prepare(scene);

        let pixels_per_point = scene
            .viewport
            .gui_pixels_per_point(full_output.pixels_per_point, window.scale_factor() as f32);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point,
        };

        for (id, delta) in full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, id, &delta);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        gpu.render_scene(&view, &mut encoder, scene);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            egui_renderer.free_texture(&id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        window.request_redraw();
    }

    fn handle_cursor(&mut self, position: Vec2) {
        let previous = self.input.cursor.replace(position);
        let (Some(previous), Some(drag), Some(scene)) = (previous, self.input.drag, &mut self.scene)
        else {
            return;
        };

        let delta = position - previous;
        let height = scene.viewport.height as f32;
        match drag {
            DragMode::Rotate => scene.controls.rotate(delta, height),
            DragMode::Pan => scene.controls.pan(delta, height, &scene.camera),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Failed to initialize: {e}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            let response = egui_state.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.handle_resize();
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let mode = match button {
                    MouseButton::Left => DragMode::Rotate,
                    MouseButton::Right => DragMode::Pan,
                    _ => return,
                };
                self.input.drag = match state {
                    ElementState::Pressed => Some(mode),
                    ElementState::Released if self.input.drag == Some(mode) => None,
                    ElementState::Released => self.input.drag,
                };
            }

            WindowEvent::CursorMoved { position, .. } => {
                let Some(window) = &self.window else { return };
                let logical = position.to_logical::<f32>(window.scale_factor());
                self.handle_cursor(Vec2::new(logical.x, logical.y));
            }

            WindowEvent::CursorLeft { .. } => {
                self.input.cursor = None;
                self.input.drag = None;
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                if let Some(scene) = &mut self.scene {
                    scene.controls.dolly(steps);
                }
            }

            WindowEvent::RedrawRequested => {
                self.update();
                self.render(event_loop);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {e}");
        std::process::exit(1);
    }
}

use crate::renderer::camera::PerspectiveCamera;

pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Renderer output size in logical pixels plus the pixel ratio used to
/// derive the drawing buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: device_pixel_ratio.min(MAX_PIXEL_RATIO),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Applies a resize to the renderer size and the camera projection.
    /// Zero-sized viewports (minimized windows) are ignored.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        device_pixel_ratio: f32,
        camera: &mut PerspectiveCamera,
    ) -> bool {
        if width == 0 || height == 0 {
            return false;
        }

        *self = Self::new(width, height, device_pixel_ratio);

        camera.aspect = self.aspect();
        camera.update_projection_matrix();

        log::debug!(
            "Viewport resized to {}x{} @ {:.2}x (buffer {:?})",
            self.width,
            self.height,
            self.pixel_ratio,
            self.drawing_buffer_size()
        );
        true
    }

    /// Points-to-pixels scale for painting the GUI into the drawing buffer.
    /// egui lays out at the host ratio, so the cap is applied on top of it.
    pub fn gui_pixels_per_point(
        &self,
        egui_pixels_per_point: f32,
        device_pixel_ratio: f32,
    ) -> f32 {
        if device_pixel_ratio <= 0.0 {
            return egui_pixels_per_point;
        }
        egui_pixels_per_point * self.pixel_ratio / device_pixel_ratio
    }

    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        (
            ((self.width as f32 * self.pixel_ratio).round() as u32).max(1),
            ((self.height as f32 * self.pixel_ratio).round() as u32).max(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn resize_updates_camera_and_renderer() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        let mut viewport = Viewport::new(1024, 1024, 1.0);

        assert!(viewport.resize(800, 600, 1.5, &mut camera));

        assert_eq!((viewport.width, viewport.height), (800, 600));
        assert_eq!(viewport.pixel_ratio, 1.5);
        assert_relative_eq!(camera.aspect, 800.0 / 600.0);

        let expected = PerspectiveCamera::new(75.0, 800.0 / 600.0, 0.1, 100.0);
        assert_eq!(camera.projection_matrix(), expected.projection_matrix());
    }

    #[test]
    fn pixel_ratio_is_capped() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        let mut viewport = Viewport::new(100, 100, 1.0);

        viewport.resize(800, 600, 3.0, &mut camera);
        assert_eq!(viewport.pixel_ratio, 2.0);
        assert_eq!(viewport.drawing_buffer_size(), (1600, 1200));

        viewport.resize(800, 600, 1.0, &mut camera);
        assert_eq!(viewport.drawing_buffer_size(), (800, 600));
    }

    #[test]
    fn gui_fills_capped_drawing_buffer() {
        let viewport = Viewport::new(1000, 800, 3.0);
        let (buffer_w, buffer_h) = viewport.drawing_buffer_size();
        assert_eq!((buffer_w, buffer_h), (2000, 1600));

        let ppp = viewport.gui_pixels_per_point(3.0, 3.0);
        assert_relative_eq!(buffer_w as f32 / ppp, 1000.0);
        assert_relative_eq!(buffer_h as f32 / ppp, 800.0);

        let uncapped = Viewport::new(1000, 800, 1.5);
        assert_relative_eq!(uncapped.gui_pixels_per_point(1.5, 1.5), 1.5);
    }

    #[test]
    fn zero_size_is_ignored() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        let mut viewport = Viewport::new(800, 600, 1.0);
        camera.aspect = viewport.aspect();

        assert!(!viewport.resize(0, 600, 1.0, &mut camera));
        assert_eq!(viewport, Viewport::new(800, 600, 1.0));
        assert_relative_eq!(camera.aspect, 800.0 / 600.0);
    }
}

//! Viewport resize handling

use crate::render::backend::RenderBackend;
use crate::render::camera::Camera;

/// Highest device pixel ratio the surface is rendered at
pub const PIXEL_RATIO_CAP: f32 = 2.0;

/// Size of the drawing surface and its pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in logical pixels
    pub width: u32,
    /// Height in logical pixels
    pub height: u32,
    /// Device pixel ratio in effect, never above [`PIXEL_RATIO_CAP`]
    pub pixel_ratio: f32,
}

impl Viewport {
    /// Viewport at the given size and platform pixel ratio
    pub fn new(width: u32, height: u32, platform_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: effective_pixel_ratio(platform_ratio),
        }
    }

    /// Width over height, or `None` while either dimension is zero
    pub fn aspect(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }

    /// Apply a resize signal to the camera and backend
    ///
    /// Repeating the same signal leaves every piece of state as it was. A
    /// zero dimension (minimised window) keeps the camera's current aspect.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        platform_ratio: f32,
        camera: &mut Camera,
        backend: &mut dyn RenderBackend,
    ) {
        self.width = width;
        self.height = height;
        self.pixel_ratio = effective_pixel_ratio(platform_ratio);

        match self.aspect() {
            Some(aspect) => camera.set_aspect_ratio(aspect),
            None => log::debug!("Viewport {width}x{height}: keeping aspect {:.3}", camera.aspect()),
        }

        backend.set_size(width, height);
        backend.set_pixel_ratio(self.pixel_ratio);
        log::info!(
            "Viewport resized to {}x{} @{}x",
            width,
            height,
            self.pixel_ratio
        );
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600, 1.0)
    }
}

/// Platform ratio capped at [`PIXEL_RATIO_CAP`]; non-positive or NaN input
/// falls back to 1
pub fn effective_pixel_ratio(platform_ratio: f32) -> f32 {
    if platform_ratio > 0.0 {
        platform_ratio.min(PIXEL_RATIO_CAP)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::HeadlessBackend;
    use approx::assert_relative_eq;

    #[test]
    fn test_resize_updates_camera_and_backend() {
        let mut viewport = Viewport::default();
        let mut camera = Camera::default();
        let mut backend = HeadlessBackend::new(800, 600);

        viewport.resize(1920, 1080, 3.0, &mut camera, &mut backend);
        assert_relative_eq!(camera.aspect(), 1920.0 / 1080.0);
        assert!(camera.needs_projection_update());
        assert_eq!(viewport.pixel_ratio, 2.0);
        assert_eq!(backend.size(), (1920, 1080));
        assert_eq!(backend.pixel_ratio(), 2.0);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut viewport = Viewport::default();
        let mut camera = Camera::default();
        let mut backend = HeadlessBackend::new(800, 600);

        viewport.resize(1024, 768, 1.5, &mut camera, &mut backend);
        camera.update_projection_matrix();
        let once = (viewport, camera.aspect(), *camera.projection_matrix());

        viewport.resize(1024, 768, 1.5, &mut camera, &mut backend);
        camera.update_projection_matrix();
        assert_eq!((viewport, camera.aspect(), *camera.projection_matrix()), once);
        assert_eq!(backend.framebuffer_size(), (1536, 1152));
    }

    #[test]
    fn test_zero_size_keeps_aspect() {
        let mut viewport = Viewport::default();
        let mut camera = Camera::default();
        let mut backend = HeadlessBackend::new(800, 600);

        viewport.resize(800, 400, 1.0, &mut camera, &mut backend);
        viewport.resize(0, 0, 1.0, &mut camera, &mut backend);
        assert_relative_eq!(camera.aspect(), 2.0);
        assert_eq!(viewport.aspect(), None);
        assert_eq!(backend.size(), (0, 0));
    }

    #[test]
    fn test_pixel_ratio_cap() {
        assert_eq!(effective_pixel_ratio(1.0), 1.0);
        assert_eq!(effective_pixel_ratio(1.25), 1.25);
        assert_eq!(effective_pixel_ratio(4.0), PIXEL_RATIO_CAP);
        assert_eq!(effective_pixel_ratio(0.0), 1.0);
        assert_eq!(effective_pixel_ratio(f32::NAN), 1.0);
    }
}

//! Backend abstraction for the render loop
//!
//! A backend receives the scene and the camera once per frame and owns
//! whatever surface it draws to. Failures are per frame: the loop logs them,
//! drops that frame and keeps going.

use thiserror::Error;

use crate::render::camera::Camera;
use crate::render::uniforms::{CameraUniform, LightingBlock};
use crate::scene::{SceneGraph, SceneNode};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Errors a backend can report for one frame
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The presentation surface went away (window closed, device lost)
    #[error("Render surface lost")]
    SurfaceLost,

    /// Building or submitting the frame failed
    #[error("Frame submission failed: {0}")]
    SubmissionFailed(String),
}

/// What a backend reports after drawing a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Backend frame number, counting successful frames only
    pub frame: u64,
    /// Lights uploaded
    pub lights: u32,
    /// Meshes and helpers drawn
    pub draw_calls: u32,
    /// Triangles submitted for meshes
    pub triangles: u32,
    /// Uniform bytes uploaded
    pub uniform_bytes: usize,
}

/// Interface the render loop draws through
pub trait RenderBackend {
    /// Draw one frame
    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> BackendResult<FrameStats>;

    /// Resize the drawing surface (logical pixels)
    fn set_size(&mut self, width: u32, height: u32);

    /// Set the device pixel ratio applied to the surface
    fn set_pixel_ratio(&mut self, ratio: f32);
}

/// Backend that builds every GPU-side block but presents nothing
///
/// Used by the console host and in tests; keeps the last uploaded blocks so
/// they can be inspected.
#[derive(Debug)]
pub struct HeadlessBackend {
    size: (u32, u32),
    pixel_ratio: f32,
    frames: u64,
    lighting: LightingBlock,
    camera: Option<CameraUniform>,
}

impl HeadlessBackend {
    /// Create a backend with the given surface size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            pixel_ratio: 1.0,
            frames: 0,
            lighting: LightingBlock::default(),
            camera: None,
        }
    }

    /// Surface size in logical pixels
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Surface size in device pixels
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let scale = |v: u32| (v as f32 * self.pixel_ratio).round() as u32;
        (scale(self.size.0), scale(self.size.1))
    }

    /// Current pixel ratio
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Lighting block of the last frame
    pub fn last_lighting(&self) -> &LightingBlock {
        &self.lighting
    }

    /// Camera block of the last frame
    pub fn last_camera(&self) -> Option<&CameraUniform> {
        self.camera.as_ref()
    }
}

impl RenderBackend for HeadlessBackend {
    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> BackendResult<FrameStats> {
        let framebuffer = self.framebuffer_size();
        if framebuffer.0 == 0 || framebuffer.1 == 0 {
            // Minimised: nothing to draw into
            return Ok(FrameStats {
                frame: self.frames,
                ..FrameStats::default()
            });
        }

        self.lighting = LightingBlock::pack(scene);
        let camera_block = CameraUniform::new(camera, framebuffer, self.pixel_ratio);
        let uniform_bytes = self.lighting.as_bytes().len() + camera_block.as_bytes().len();
        self.camera = Some(camera_block);

        let mut stats = FrameStats {
            lights: self.lighting.count,
            uniform_bytes,
            ..FrameStats::default()
        };
        for (_, node) in scene.visible() {
            match node {
                SceneNode::Mesh(mesh) => {
                    stats.draw_calls += 1;
                    stats.triangles += mesh.primitive.triangle_count();
                }
                SceneNode::Helper(_) => stats.draw_calls += 1,
                SceneNode::Light(_) | SceneNode::Camera(_) => {}
            }
        }

        self.frames += 1;
        stats.frame = self.frames;
        log::trace!(
            "Headless frame {}: {} lights, {} draws",
            stats.frame,
            stats.lights,
            stats.draw_calls
        );
        Ok(stats)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio;
    }
}

//! Test doubles

use crate::render::backend::{BackendResult, FrameStats, RenderBackend, RenderError};
use crate::render::camera::Camera;
use crate::scene::SceneGraph;
use crate::CancelToken;

/// What the backend saw when a frame was submitted
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub aspect: f32,
    pub projection_dirty: bool,
    pub helper_revisions: u64,
    pub visible_nodes: usize,
}

/// Backend that records every submission and can be told to fail or cancel
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub frames: Vec<FrameSnapshot>,
    pub sizes: Vec<(u32, u32)>,
    pub pixel_ratios: Vec<f32>,
    /// 1-based submission numbers that fail
    pub fail_on: Vec<u64>,
    /// Cancel the loop while drawing this submission
    pub cancel_on: Option<(u64, CancelToken)>,
    submissions: u64,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> u64 {
        self.submissions
    }
}

impl RenderBackend for RecordingBackend {
    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> BackendResult<FrameStats> {
        self.submissions += 1;
        if let Some((at, token)) = &self.cancel_on {
            if *at == self.submissions {
                token.cancel();
            }
        }
        if self.fail_on.contains(&self.submissions) {
            return Err(RenderError::SubmissionFailed(format!(
                "injected failure {}",
                self.submissions
            )));
        }
        self.frames.push(FrameSnapshot {
            aspect: camera.aspect(),
            projection_dirty: camera.needs_projection_update(),
            helper_revisions: scene.helpers().map(|(_, h)| h.revision()).sum(),
            visible_nodes: scene.visible().count(),
        });
        Ok(FrameStats {
            frame: self.frames.len() as u64,
            ..FrameStats::default()
        })
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.sizes.push((width, height));
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratios.push(ratio);
    }
}

//! # Rig Engine
//!
//! A small lighting workbench: six kinds of light around a handful of
//! primitives, a live parameter panel bound to the lights' fields, and a
//! render loop that animates the scene and draws it through a pluggable
//! backend.
//!
//! ## Features
//!
//! - **Light rig**: ambient, directional, hemisphere, point, area and spot
//!   lights, each with a toggleable helper gizmo
//! - **Debug panel**: sliders and checkboxes with range clamping and
//!   per-control change hooks
//! - **Render loop**: cooperative cancellation, per-frame error isolation and
//!   host events drained at tick boundaries
//! - **Viewport**: resize handling with a capped pixel ratio
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rig_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RigConfig::default();
//!     let mut engine = Engine::new(&config, HeadlessBackend::new(800, 600))?;
//!     let mut render_loop = RenderLoop::new(SystemClock::new(), FixedRateScheduler::new(60))
//!         .with_max_frames(Some(600));
//!     render_loop.run(&mut engine)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]

pub mod foundation;

pub mod animation;
pub mod config;
pub mod controls;
pub mod panel;
pub mod render;
pub mod rig;
pub mod scene;
pub mod viewport;

mod engine;
mod render_loop;

#[cfg(test)]
mod tests;

pub use engine::{Engine, EngineError};
pub use render_loop::{
    CancelToken, FixedRateScheduler, FrameScheduler, ImmediateScheduler, LoopEvent, LoopState,
    LoopSummary, RenderLoop,
};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::AnimationDriver,
        config::{Config, ConfigError, RigConfig},
        controls::{CameraController, OrbitControls},
        foundation::{
            collections::NodeKey,
            math::{Mat4, Transform, Vec3},
            time::{FrameClock, ManualClock, SystemClock, Timer},
        },
        panel::{DebugPanel, FlagField, NumericField, PanelError, ParamValue},
        render::{Camera, FrameStats, HeadlessBackend, Light, RenderBackend, RenderError},
        scene::SceneGraph,
        viewport::Viewport,
        CancelToken, Engine, EngineError, FixedRateScheduler, FrameScheduler, ImmediateScheduler,
        LoopEvent, LoopState, RenderLoop,
    };
}

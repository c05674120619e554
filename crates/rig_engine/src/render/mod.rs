//! # Rendering
//!
//! Scene-side render types and the backend boundary.
//!
//! - **Lighting**: the six light kinds and their parameters
//! - **Helpers**: debug gizmos derived from lights
//! - **Mesh**: primitive descriptors and the shared material
//! - **Camera**: perspective camera with a cached projection
//! - **Backend**: the per-frame draw interface and a headless implementation
//! - **Uniforms**: `Pod` blocks in GPU layout

pub mod backend;
pub mod camera;
pub mod helpers;
pub mod lighting;
pub mod mesh;
pub mod uniforms;

pub use backend::{BackendResult, FrameStats, HeadlessBackend, RenderBackend, RenderError};
pub use camera::Camera;
pub use helpers::{HelperGeometry, LightHelper};
pub use lighting::{color_from_hex, Color, Light, LightKind, LightShape};
pub use mesh::{Mesh, Primitive, StandardMaterial};

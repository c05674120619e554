//! Scene management
//!
//! The scene graph owns every render participant (lights, helpers, meshes,
//! camera) and the materials they share.

mod scene_graph;

pub use scene_graph::{SceneGraph, SceneNode};

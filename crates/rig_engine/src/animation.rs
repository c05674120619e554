//! Mesh animation
//!
//! Rotation is a pure function of elapsed time, so replaying the same `t`
//! always produces the same pose no matter how many frames ran before.

use crate::foundation::collections::NodeKey;
use crate::scene::SceneGraph;

/// Y rotation rate in radians per second
pub const SPIN_RATE_Y: f32 = 0.1;

/// X rotation rate in radians per second
pub const SPIN_RATE_X: f32 = 0.15;

/// Rotates a fixed set of meshes from elapsed time
#[derive(Debug, Clone, Default)]
pub struct AnimationDriver {
    targets: Vec<NodeKey>,
}

impl AnimationDriver {
    /// Drive the given meshes
    pub fn new(targets: impl IntoIterator<Item = NodeKey>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
        }
    }

    /// Meshes this driver rotates
    pub fn targets(&self) -> &[NodeKey] {
        &self.targets
    }

    /// Pose every target for elapsed time `t` (seconds since loop start)
    pub fn apply(&self, scene: &mut SceneGraph, t: f32) {
        for &key in &self.targets {
            if let Some(mesh) = scene.mesh_mut(key) {
                mesh.transform.rotation.y = SPIN_RATE_Y * t;
                mesh.transform.rotation.x = SPIN_RATE_X * t;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::camera::Camera;
    use crate::rig;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_follows_time() {
        let mut scene = SceneGraph::new();
        let handles = rig::build_scene(&mut scene, Camera::default());
        let driver = AnimationDriver::new(handles.animated());

        driver.apply(&mut scene, 4.0);
        for key in handles.animated() {
            let rotation = scene.mesh(key).unwrap().transform.rotation;
            assert_relative_eq!(rotation.y, 0.4, epsilon = 1e-6);
            assert_relative_eq!(rotation.x, 0.6, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_repeated_apply_is_stable() {
        let mut scene = SceneGraph::new();
        let handles = rig::build_scene(&mut scene, Camera::default());
        let driver = AnimationDriver::new(handles.animated());

        driver.apply(&mut scene, 2.5);
        let first = scene.mesh(handles.cube).unwrap().transform.clone();
        driver.apply(&mut scene, 2.5);
        driver.apply(&mut scene, 2.5);
        assert_eq!(scene.mesh(handles.cube).unwrap().transform, first);
    }

    #[test]
    fn test_floor_is_not_animated() {
        let mut scene = SceneGraph::new();
        let handles = rig::build_scene(&mut scene, Camera::default());
        let before = scene.mesh(handles.plane).unwrap().transform.clone();
        AnimationDriver::new(handles.animated()).apply(&mut scene, 10.0);
        assert_eq!(scene.mesh(handles.plane).unwrap().transform, before);
    }
}

//! # Perspective Camera
//!
//! Camera state plus a cached projection matrix. Anything that changes a
//! projection input (field of view, aspect, clip planes) only marks the cache
//! dirty; the render loop calls [`Camera::update_projection_matrix`] before
//! the next frame is submitted, mirroring how the window resize path works.
//!
//! ## Coordinate System
//! Right-handed, Y-up. The view matrix is computed on demand from position,
//! target and up, since orbit controls move the camera every frame.

use bitflags::bitflags;

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

bitflags! {
    /// Cached camera state that must be recomputed before rendering
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CameraDirty: u8 {
        /// Projection inputs changed since the last `update_projection_matrix`
        const PROJECTION = 0b0000_0001;
    }
}

/// 3D perspective camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    projection: Mat4,
    dirty: CameraDirty,
}

impl Camera {
    /// Create a new perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let fov = utils::deg_to_rad(fov_degrees);
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov,
            aspect,
            near,
            far,
            projection: Mat4::perspective(fov, aspect, near, far),
            dirty: CameraDirty::empty(),
        }
    }

    /// Vertical field of view in radians
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Current aspect ratio (width / height)
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Near and far clip distances
    pub fn clip_planes(&self) -> (f32, f32) {
        (self.near, self.far)
    }

    /// Update camera aspect ratio for viewport changes
    ///
    /// Marks the projection dirty; the cached matrix keeps the old aspect
    /// until `update_projection_matrix` runs.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        // Use a threshold to keep resize drags from spamming the log
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
        self.dirty.insert(CameraDirty::PROJECTION);
    }

    /// Change the vertical field of view (degrees)
    pub fn set_fov_degrees(&mut self, fov_degrees: f32) {
        self.fov = utils::deg_to_rad(fov_degrees);
        self.dirty.insert(CameraDirty::PROJECTION);
    }

    /// Whether the projection must be recomputed before the next frame
    pub fn needs_projection_update(&self) -> bool {
        self.dirty.contains(CameraDirty::PROJECTION)
    }

    /// Recompute the cached projection matrix and clear the dirty flag
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective(self.fov, self.aspect, self.near, self.far);
        self.dirty.remove(CameraDirty::PROJECTION);
        log::trace!("Camera projection recomputed (aspect {:.3})", self.aspect);
    }

    /// Cached projection matrix as of the last update
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    /// View matrix for world-to-camera space transformation
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Combined projection × view matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(Vec3::new(1.0, 1.0, 2.0), 75.0, 16.0 / 9.0, 0.1, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aspect_change_marks_projection_dirty() {
        let mut camera = Camera::default();
        assert!(!camera.needs_projection_update());

        let before = *camera.projection_matrix();
        camera.set_aspect_ratio(2.0);
        assert!(camera.needs_projection_update());
        assert_eq!(*camera.projection_matrix(), before);

        camera.update_projection_matrix();
        assert!(!camera.needs_projection_update());
        assert_relative_eq!(
            *camera.projection_matrix(),
            Mat4::new_perspective(2.0, camera.fov(), 0.1, 100.0)
        );
    }

    #[test]
    fn test_view_matrix_moves_target_onto_negative_z() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 75.0, 1.0, 0.1, 100.0);
        let target_in_view = camera.view_matrix().transform_point(&nalgebra::Point3::origin());
        assert_relative_eq!(target_in_view.z, -5.0, epsilon = 1e-5);
    }
}

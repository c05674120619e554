//! Mesh and material descriptors
//!
//! Tessellation belongs to the rendering backend; the scene only records
//! which primitive to build, with which parameters, and where it sits.

use std::rc::Rc;

use crate::foundation::math::{Transform, Vec3};
use crate::render::lighting::Color;

/// Physically based material shared by several meshes
///
/// Immutable once the scene is built, so meshes hold it behind an `Rc`.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    /// Base color
    pub base_color: Color,
    /// Surface roughness, `0..=1`
    pub roughness: f32,
    /// Metalness, `0..=1`
    pub metalness: f32,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            base_color: Color::new(1.0, 1.0, 1.0),
            roughness: 1.0,
            metalness: 0.0,
        }
    }
}

/// Primitive geometry the backend knows how to tessellate
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// UV sphere
    Sphere {
        /// Sphere radius
        radius: f32,
        /// Horizontal segments
        width_segments: u32,
        /// Vertical segments
        height_segments: u32,
    },
    /// Axis-aligned box
    Box {
        /// Size along X
        width: f32,
        /// Size along Y
        height: f32,
        /// Size along Z
        depth: f32,
    },
    /// Torus around the Z axis
    Torus {
        /// Distance from the center to the tube center
        radius: f32,
        /// Tube radius
        tube: f32,
        /// Segments around the tube
        radial_segments: u32,
        /// Segments around the ring
        tubular_segments: u32,
    },
    /// Flat plane in the XY plane
    Plane {
        /// Size along X
        width: f32,
        /// Size along Y
        height: f32,
    },
}

impl Primitive {
    /// Approximate triangle count the backend will produce
    pub fn triangle_count(&self) -> u32 {
        match *self {
            Self::Sphere {
                width_segments,
                height_segments,
                ..
            } => width_segments * height_segments * 2,
            Self::Box { .. } => 12,
            Self::Torus {
                radial_segments,
                tubular_segments,
                ..
            } => radial_segments * tubular_segments * 2,
            Self::Plane { .. } => 2,
        }
    }
}

/// A renderable primitive with a transform and a shared material
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Display name
    pub name: String,
    /// Geometry to tessellate
    pub primitive: Primitive,
    /// Placement in the world
    pub transform: Transform,
    /// Whether the mesh is drawn
    pub visible: bool,
    material: Rc<StandardMaterial>,
}

impl Mesh {
    /// Create a visible mesh at the origin
    pub fn new(name: &str, primitive: Primitive, material: Rc<StandardMaterial>) -> Self {
        Self {
            name: name.to_string(),
            primitive,
            transform: Transform::default(),
            visible: true,
            material,
        }
    }

    /// Builder-style position override
    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Builder-style rotation override (euler XYZ, radians)
    #[must_use]
    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.transform.rotation = rotation;
        self
    }

    /// Material shared with other meshes
    pub fn material(&self) -> &Rc<StandardMaterial> {
        &self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meshes_share_material() {
        let material = Rc::new(StandardMaterial {
            roughness: 0.4,
            ..Default::default()
        });
        let cube = Mesh::new(
            "cube",
            Primitive::Box {
                width: 0.75,
                height: 0.75,
                depth: 0.75,
            },
            Rc::clone(&material),
        );
        let plane = Mesh::new(
            "plane",
            Primitive::Plane {
                width: 5.0,
                height: 5.0,
            },
            Rc::clone(&material),
        );
        assert!(Rc::ptr_eq(cube.material(), plane.material()));
        assert_eq!(Rc::strong_count(&material), 3);
    }

    #[test]
    fn test_triangle_counts() {
        let sphere = Primitive::Sphere {
            radius: 0.5,
            width_segments: 32,
            height_segments: 32,
        };
        assert_eq!(sphere.triangle_count(), 2048);
        assert_eq!(
            Primitive::Plane {
                width: 1.0,
                height: 1.0
            }
            .triangle_count(),
            2
        );
    }
}

//! Light helper gizmos
//!
//! A [`LightHelper`] visualises where a light sits and what shape it has. Its
//! geometry is derived from the light when the helper is created and again on
//! every explicit [`LightHelper::refresh`]; editing the light in between
//! leaves the helper stale. Nothing tracks the light automatically.

use crate::foundation::collections::NodeKey;
use crate::foundation::math::{constants, Vec3};
use crate::render::lighting::{Color, Light, LightShape};

/// Default gizmo size for helpers that don't take their extent from the light
pub const DEFAULT_HELPER_SIZE: f32 = 1.0;

/// Cone length drawn for spot lights with unlimited range
pub const UNLIMITED_CONE_LENGTH: f32 = 1000.0;

/// Widest cone half-angle drawn; `tan` diverges at a right angle
pub const MAX_CONE_ANGLE: f32 = constants::HALF_PI - 1e-3;

/// Debug geometry derived from a light
#[derive(Debug, Clone, PartialEq)]
pub enum HelperGeometry {
    /// Small marker with no spatial meaning (ambient light)
    Marker {
        /// Where the marker is drawn
        position: Vec3,
    },
    /// Square facing the light direction plus a line to the target
    Plane {
        /// Square center
        center: Vec3,
        /// Half the square's side length
        half_size: f32,
        /// End of the direction line
        line_end: Vec3,
    },
    /// Octahedron split into sky and ground halves
    Octahedron {
        /// Center of the gizmo
        center: Vec3,
        /// Gizmo radius
        size: f32,
        /// Upper half color
        sky: Color,
        /// Lower half color
        ground: Color,
    },
    /// Wire sphere around a point light
    Sphere {
        /// Sphere center
        center: Vec3,
        /// Sphere radius
        radius: f32,
    },
    /// Outline of an area light
    Rectangle {
        /// Rectangle center
        center: Vec3,
        /// Unit normal the rectangle faces
        facing: Vec3,
        /// Rectangle width
        width: f32,
        /// Rectangle height
        height: f32,
    },
    /// Cone of a spot light
    Cone {
        /// Cone apex at the light position
        apex: Vec3,
        /// Unit axis toward the target
        axis: Vec3,
        /// Axis length
        length: f32,
        /// Base radius
        radius: f32,
    },
}

/// Compute the gizmo for `light` at the given size
pub fn derive_geometry(light: &Light, size: f32) -> HelperGeometry {
    let down = Vec3::new(0.0, -1.0, 0.0);
    match light.shape {
        LightShape::Ambient => HelperGeometry::Marker {
            position: Vec3::zeros(),
        },
        LightShape::Directional { position, target } => HelperGeometry::Plane {
            center: position,
            half_size: size,
            line_end: target,
        },
        LightShape::Hemisphere {
            ground_color,
            position,
        } => HelperGeometry::Octahedron {
            center: position,
            size,
            sky: light.color,
            ground: ground_color,
        },
        LightShape::Point { position, .. } => HelperGeometry::Sphere {
            center: position,
            radius: size,
        },
        LightShape::RectArea {
            position,
            target,
            width,
            height,
        } => HelperGeometry::Rectangle {
            center: position,
            facing: (target - position).try_normalize(f32::EPSILON).unwrap_or(down),
            width,
            height,
        },
        LightShape::Spot {
            position,
            target,
            distance,
            angle,
            ..
        } => {
            let length = if distance > 0.0 {
                distance
            } else {
                UNLIMITED_CONE_LENGTH
            };
            HelperGeometry::Cone {
                apex: position,
                axis: (target - position).try_normalize(f32::EPSILON).unwrap_or(down),
                length,
                radius: length * angle.clamp(0.0, MAX_CONE_ANGLE).tan(),
            }
        }
    }
}

/// Debug visualiser attached to exactly one light
#[derive(Debug, Clone)]
pub struct LightHelper {
    light: NodeKey,
    /// Whether the gizmo is drawn; helpers start hidden
    pub visible: bool,
    size: f32,
    geometry: HelperGeometry,
    revision: u64,
}

impl LightHelper {
    /// Create a hidden helper for the light stored under `light_key`
    pub fn new(light_key: NodeKey, light: &Light) -> Self {
        Self::with_size(light_key, light, DEFAULT_HELPER_SIZE)
    }

    /// Create a hidden helper with a custom gizmo size
    pub fn with_size(light_key: NodeKey, light: &Light, size: f32) -> Self {
        Self {
            light: light_key,
            visible: false,
            size,
            geometry: derive_geometry(light, size),
            revision: 0,
        }
    }

    /// Key of the light this helper visualises
    pub fn light(&self) -> NodeKey {
        self.light
    }

    /// Geometry as of the last refresh
    pub fn geometry(&self) -> &HelperGeometry {
        &self.geometry
    }

    /// Number of refreshes performed since creation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Re-derive the geometry from the current light parameters
    pub fn refresh(&mut self, light: &Light) {
        self.geometry = derive_geometry(light, self.size);
        self.revision += 1;
        log::debug!("Refreshed helper for '{}' (revision {})", light.name, self.revision);
    }

    /// Whether the stored geometry no longer matches `light`
    pub fn is_stale(&self, light: &Light) -> bool {
        derive_geometry(light, self.size) != self.geometry
    }
}

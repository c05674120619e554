//! Light models
//!
//! Six light kinds share a common header (name, color, intensity,
//! visibility) and carry their kind-specific parameters in [`LightShape`].
//! Parameter ranges are construction-time invariants: they are checked with
//! `debug_assert!` only, and edits coming through the debug panel are clamped
//! before they reach these fields.

use crate::foundation::math::{constants, Vec3};

/// RGB color, each channel in `0.0..=1.0`
pub type Color = Vec3;

/// Convert a `0xRRGGBB` literal into a linear RGB triple
pub fn color_from_hex(hex: u32) -> Color {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    Color::new(channel(16), channel(8), channel(0))
}

/// Discriminant of a light, used as a lookup key for derived-update rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    /// Uniform light from everywhere
    Ambient,
    /// Parallel rays travelling from `position` toward the target
    Directional,
    /// Sky color from above, ground color from below
    Hemisphere,
    /// Omnidirectional bulb with distance falloff
    Point,
    /// Emitting rectangle
    RectArea,
    /// Cone of light
    Spot,
}

impl LightKind {
    /// All kinds in rig order
    pub const ALL: [Self; 6] = [
        Self::Ambient,
        Self::Directional,
        Self::Hemisphere,
        Self::Point,
        Self::RectArea,
        Self::Spot,
    ];
}

/// Kind-specific light parameters
#[derive(Debug, Clone, PartialEq)]
pub enum LightShape {
    /// No spatial parameters
    Ambient,
    /// Direction is derived from `position` toward `target`
    Directional {
        /// Source position
        position: Vec3,
        /// Point the rays travel toward
        target: Vec3,
    },
    /// Sky color is the light's main `color`
    Hemisphere {
        /// Color received from below
        ground_color: Color,
        /// Up axis of the sky/ground split
        position: Vec3,
    },
    /// Light bulb
    Point {
        /// Bulb position
        position: Vec3,
        /// Falloff cutoff; zero means unlimited range
        distance: f32,
        /// Falloff exponent
        decay: f32,
    },
    /// Area light facing `target`
    RectArea {
        /// Center of the rectangle
        position: Vec3,
        /// Look-at point
        target: Vec3,
        /// Rectangle width
        width: f32,
        /// Rectangle height
        height: f32,
    },
    /// Flashlight
    Spot {
        /// Apex of the cone
        position: Vec3,
        /// Point the cone axis passes through
        target: Vec3,
        /// Falloff cutoff; zero means unlimited range
        distance: f32,
        /// Half-angle of the cone in radians, `0..=π/2`
        angle: f32,
        /// Edge softness, `0..=1`
        penumbra: f32,
        /// Falloff exponent
        decay: f32,
    },
}

/// A light source in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Display name, also used as the panel folder name
    pub name: String,
    /// Main color (sky color for hemisphere lights)
    pub color: Color,
    /// Intensity multiplier, never negative
    pub intensity: f32,
    /// Whether the light contributes to the frame
    pub visible: bool,
    /// Kind-specific parameters
    pub shape: LightShape,
}

impl Light {
    fn new(name: &str, color: Color, intensity: f32, shape: LightShape) -> Self {
        debug_assert!(intensity >= 0.0, "light intensity must not be negative");
        Self {
            name: name.to_string(),
            color,
            intensity,
            visible: true,
            shape,
        }
    }

    /// Create an ambient light
    pub fn ambient(name: &str, color: Color, intensity: f32) -> Self {
        Self::new(name, color, intensity, LightShape::Ambient)
    }

    /// Create a directional light shining from `position` toward the origin
    pub fn directional(name: &str, color: Color, intensity: f32, position: Vec3) -> Self {
        Self::new(
            name,
            color,
            intensity,
            LightShape::Directional {
                position,
                target: Vec3::zeros(),
            },
        )
    }

    /// Create a hemisphere light with the sky straight up
    pub fn hemisphere(name: &str, sky: Color, ground: Color, intensity: f32) -> Self {
        Self::new(
            name,
            sky,
            intensity,
            LightShape::Hemisphere {
                ground_color: ground,
                position: Vec3::new(0.0, 1.0, 0.0),
            },
        )
    }

    /// Create a point light
    pub fn point(
        name: &str,
        color: Color,
        intensity: f32,
        position: Vec3,
        distance: f32,
        decay: f32,
    ) -> Self {
        debug_assert!(distance >= 0.0 && decay >= 0.0);
        Self::new(
            name,
            color,
            intensity,
            LightShape::Point {
                position,
                distance,
                decay,
            },
        )
    }

    /// Create a rectangular area light looking at `target`
    pub fn rect_area(
        name: &str,
        color: Color,
        intensity: f32,
        size: (f32, f32),
        position: Vec3,
        target: Vec3,
    ) -> Self {
        Self::new(
            name,
            color,
            intensity,
            LightShape::RectArea {
                position,
                target,
                width: size.0,
                height: size.1,
            },
        )
    }

    /// Create a spot light
    pub fn spot(
        name: &str,
        color: Color,
        intensity: f32,
        distance: f32,
        angle: f32,
        penumbra: f32,
        decay: f32,
    ) -> Self {
        debug_assert!(distance >= 0.0);
        debug_assert!((0.0..=constants::HALF_PI).contains(&angle));
        debug_assert!((0.0..=1.0).contains(&penumbra));
        Self::new(
            name,
            color,
            intensity,
            LightShape::Spot {
                position: Vec3::new(0.0, 1.0, 0.0),
                target: Vec3::zeros(),
                distance,
                angle,
                penumbra,
                decay,
            },
        )
    }

    /// Builder-style position override for lights that have one
    #[must_use]
    pub fn with_position(mut self, new_position: Vec3) -> Self {
        if let Some(position) = self.position_mut() {
            *position = new_position;
        }
        self
    }

    /// Builder-style target override for lights that aim at a point
    #[must_use]
    pub fn with_target(mut self, new_target: Vec3) -> Self {
        match &mut self.shape {
            LightShape::Directional { target, .. }
            | LightShape::RectArea { target, .. }
            | LightShape::Spot { target, .. } => *target = new_target,
            _ => {}
        }
        self
    }

    /// Which kind of light this is
    pub fn kind(&self) -> LightKind {
        match self.shape {
            LightShape::Ambient => LightKind::Ambient,
            LightShape::Directional { .. } => LightKind::Directional,
            LightShape::Hemisphere { .. } => LightKind::Hemisphere,
            LightShape::Point { .. } => LightKind::Point,
            LightShape::RectArea { .. } => LightKind::RectArea,
            LightShape::Spot { .. } => LightKind::Spot,
        }
    }

    /// World position, if the kind has one
    pub fn position(&self) -> Option<Vec3> {
        match self.shape {
            LightShape::Ambient => None,
            LightShape::Directional { position, .. }
            | LightShape::Hemisphere { position, .. }
            | LightShape::Point { position, .. }
            | LightShape::RectArea { position, .. }
            | LightShape::Spot { position, .. } => Some(position),
        }
    }

    /// Mutable world position, if the kind has one
    pub fn position_mut(&mut self) -> Option<&mut Vec3> {
        match &mut self.shape {
            LightShape::Ambient => None,
            LightShape::Directional { position, .. }
            | LightShape::Hemisphere { position, .. }
            | LightShape::Point { position, .. }
            | LightShape::RectArea { position, .. }
            | LightShape::Spot { position, .. } => Some(position),
        }
    }

    /// Look-at target, if the kind aims at one
    pub fn target(&self) -> Option<Vec3> {
        match self.shape {
            LightShape::Directional { target, .. }
            | LightShape::RectArea { target, .. }
            | LightShape::Spot { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Unit direction from the light toward its target
    pub fn direction(&self) -> Option<Vec3> {
        let position = self.position()?;
        let target = self.target()?;
        (target - position).try_normalize(f32::EPSILON)
    }

    /// Color received from below, for hemisphere lights
    pub fn ground_color(&self) -> Option<Color> {
        match self.shape {
            LightShape::Hemisphere { ground_color, .. } => Some(ground_color),
            _ => None,
        }
    }
}

//! Field descriptors
//!
//! Controls name the field they edit with a descriptor instead of reaching
//! into objects by string. Each bindable type resolves a descriptor to a
//! typed slot through [`FieldAccess`]; a descriptor the type doesn't have
//! resolves to `None`.

use std::fmt;

use crate::render::helpers::LightHelper;
use crate::render::lighting::{Light, LightShape};
use crate::render::mesh::Mesh;
use crate::scene::SceneNode;

/// Numeric fields a control can edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    /// Light intensity
    Intensity,
    /// Falloff cutoff of point and spot lights
    Distance,
    /// Falloff exponent of point and spot lights
    Decay,
    /// Spot cone half-angle
    Angle,
    /// Spot edge softness
    Penumbra,
    /// Area light width
    Width,
    /// Area light height
    Height,
    /// World X position
    PositionX,
    /// World Y position
    PositionY,
    /// World Z position
    PositionZ,
}

impl NumericField {
    /// Field name as shown in logs
    pub fn name(self) -> &'static str {
        match self {
            Self::Intensity => "intensity",
            Self::Distance => "distance",
            Self::Decay => "decay",
            Self::Angle => "angle",
            Self::Penumbra => "penumbra",
            Self::Width => "width",
            Self::Height => "height",
            Self::PositionX => "position.x",
            Self::PositionY => "position.y",
            Self::PositionZ => "position.z",
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Boolean fields a control can toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagField {
    /// Whether the owner is drawn
    Visible,
}

impl fmt::Display for FlagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visible => f.write_str("visible"),
        }
    }
}

/// Typed accessors from field descriptors to storage
pub trait FieldAccess {
    /// Current value of a numeric field
    fn numeric(&self, field: NumericField) -> Option<f32>;

    /// Writable slot of a numeric field
    fn numeric_mut(&mut self, field: NumericField) -> Option<&mut f32>;

    /// Current value of a flag field
    fn flag(&self, field: FlagField) -> Option<bool>;

    /// Writable slot of a flag field
    fn flag_mut(&mut self, field: FlagField) -> Option<&mut bool>;
}

impl FieldAccess for Light {
    fn numeric(&self, field: NumericField) -> Option<f32> {
        let position = self.position();
        match (field, &self.shape) {
            (NumericField::Intensity, _) => Some(self.intensity),
            (
                NumericField::Distance,
                LightShape::Point { distance, .. } | LightShape::Spot { distance, .. },
            ) => Some(*distance),
            (
                NumericField::Decay,
                LightShape::Point { decay, .. } | LightShape::Spot { decay, .. },
            ) => Some(*decay),
            (NumericField::Angle, LightShape::Spot { angle, .. }) => Some(*angle),
            (NumericField::Penumbra, LightShape::Spot { penumbra, .. }) => Some(*penumbra),
            (NumericField::Width, LightShape::RectArea { width, .. }) => Some(*width),
            (NumericField::Height, LightShape::RectArea { height, .. }) => Some(*height),
            (NumericField::PositionX, _) => position.map(|p| p.x),
            (NumericField::PositionY, _) => position.map(|p| p.y),
            (NumericField::PositionZ, _) => position.map(|p| p.z),
            _ => None,
        }
    }

    fn numeric_mut(&mut self, field: NumericField) -> Option<&mut f32> {
        match field {
            NumericField::Intensity => return Some(&mut self.intensity),
            NumericField::PositionX => return self.position_mut().map(|p| &mut p.x),
            NumericField::PositionY => return self.position_mut().map(|p| &mut p.y),
            NumericField::PositionZ => return self.position_mut().map(|p| &mut p.z),
            _ => {}
        }
        match &mut self.shape {
            LightShape::Point {
                distance, decay, ..
            } => match field {
                NumericField::Distance => Some(distance),
                NumericField::Decay => Some(decay),
                _ => None,
            },
            LightShape::Spot {
                distance,
                angle,
                penumbra,
                decay,
                ..
            } => match field {
                NumericField::Distance => Some(distance),
                NumericField::Decay => Some(decay),
                NumericField::Angle => Some(angle),
                NumericField::Penumbra => Some(penumbra),
                _ => None,
            },
            LightShape::RectArea { width, height, .. } => match field {
                NumericField::Width => Some(width),
                NumericField::Height => Some(height),
                _ => None,
            },
            _ => None,
        }
    }

    fn flag(&self, field: FlagField) -> Option<bool> {
        match field {
            FlagField::Visible => Some(self.visible),
        }
    }

    fn flag_mut(&mut self, field: FlagField) -> Option<&mut bool> {
        match field {
            FlagField::Visible => Some(&mut self.visible),
        }
    }
}

impl FieldAccess for LightHelper {
    fn numeric(&self, _field: NumericField) -> Option<f32> {
        None
    }

    fn numeric_mut(&mut self, _field: NumericField) -> Option<&mut f32> {
        None
    }

    fn flag(&self, field: FlagField) -> Option<bool> {
        match field {
            FlagField::Visible => Some(self.visible),
        }
    }

    fn flag_mut(&mut self, field: FlagField) -> Option<&mut bool> {
        match field {
            FlagField::Visible => Some(&mut self.visible),
        }
    }
}

impl FieldAccess for Mesh {
    fn numeric(&self, field: NumericField) -> Option<f32> {
        let position = self.transform.position;
        match field {
            NumericField::PositionX => Some(position.x),
            NumericField::PositionY => Some(position.y),
            NumericField::PositionZ => Some(position.z),
            _ => None,
        }
    }

    fn numeric_mut(&mut self, field: NumericField) -> Option<&mut f32> {
        let position = &mut self.transform.position;
        match field {
            NumericField::PositionX => Some(&mut position.x),
            NumericField::PositionY => Some(&mut position.y),
            NumericField::PositionZ => Some(&mut position.z),
            _ => None,
        }
    }

    fn flag(&self, field: FlagField) -> Option<bool> {
        match field {
            FlagField::Visible => Some(self.visible),
        }
    }

    fn flag_mut(&mut self, field: FlagField) -> Option<&mut bool> {
        match field {
            FlagField::Visible => Some(&mut self.visible),
        }
    }
}

impl FieldAccess for SceneNode {
    fn numeric(&self, field: NumericField) -> Option<f32> {
        match self {
            Self::Light(light) => light.numeric(field),
            Self::Helper(helper) => helper.numeric(field),
            Self::Mesh(mesh) => mesh.numeric(field),
            Self::Camera(_) => None,
        }
    }

    fn numeric_mut(&mut self, field: NumericField) -> Option<&mut f32> {
        match self {
            Self::Light(light) => light.numeric_mut(field),
            Self::Helper(helper) => helper.numeric_mut(field),
            Self::Mesh(mesh) => mesh.numeric_mut(field),
            Self::Camera(_) => None,
        }
    }

    fn flag(&self, field: FlagField) -> Option<bool> {
        match self {
            Self::Light(light) => light.flag(field),
            Self::Helper(helper) => helper.flag(field),
            Self::Mesh(mesh) => mesh.flag(field),
            Self::Camera(_) => None,
        }
    }

    fn flag_mut(&mut self, field: FlagField) -> Option<&mut bool> {
        match self {
            Self::Light(light) => light.flag_mut(field),
            Self::Helper(helper) => helper.flag_mut(field),
            Self::Mesh(mesh) => mesh.flag_mut(field),
            Self::Camera(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::lighting::Color;

    #[test]
    fn test_spot_exposes_cone_fields() {
        let mut spot = Light::spot("spot", Color::zeros(), 0.5, 10.0, 0.3, 0.25, 1.0);
        assert_eq!(spot.numeric(NumericField::Angle), Some(0.3));
        *spot.numeric_mut(NumericField::Penumbra).unwrap() = 0.5;
        assert_eq!(spot.numeric(NumericField::Penumbra), Some(0.5));
        assert!(spot.numeric(NumericField::Width).is_none());
    }

    #[test]
    fn test_ambient_has_no_position() {
        let mut ambient = Light::ambient("ambient", Color::zeros(), 0.5);
        assert!(ambient.numeric(NumericField::PositionX).is_none());
        assert!(ambient.numeric_mut(NumericField::Distance).is_none());
        assert_eq!(ambient.numeric(NumericField::Intensity), Some(0.5));
    }

    #[test]
    fn test_position_fields_write_through() {
        let mut point = Light::point("point", Color::zeros(), 0.5, Vec3::zeros(), 3.0, 2.0);
        *point.numeric_mut(NumericField::PositionY).unwrap() = -0.5;
        assert_eq!(point.position(), Some(Vec3::new(0.0, -0.5, 0.0)));
    }
}

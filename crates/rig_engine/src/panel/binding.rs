//! Control bindings

use std::fmt;

use crate::foundation::collections::NodeKey;
use crate::foundation::math::utils;
use crate::panel::fields::{FlagField, NumericField};
use crate::scene::SceneGraph;

/// Value carried by a control edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Numeric slider value
    Number(f32),
    /// Checkbox value
    Flag(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value:.3}"),
            Self::Flag(value) => write!(f, "{value}"),
        }
    }
}

/// Field a binding reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRef {
    /// Numeric field
    Numeric(NumericField),
    /// Boolean field
    Flag(FlagField),
}

/// Kind of control and its input constraints
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    /// Slider with a closed range and step
    Slider {
        /// Smallest storable value
        min: f32,
        /// Largest storable value
        max: f32,
        /// Snap increment
        step: f32,
    },
    /// Checkbox
    Toggle,
}

impl Control {
    /// Value a slider actually stores for `raw` input: snapped to the step
    /// grid, then clamped into range. NaN maps to `min`.
    pub fn constrain(&self, raw: f32) -> f32 {
        match *self {
            Self::Slider { min, max, step } => {
                if raw.is_nan() {
                    return min;
                }
                utils::clamp(utils::snap(raw, step), min, max)
            }
            Self::Toggle => raw,
        }
    }
}

/// Hook run after a control writes its field
///
/// Receives the scene so it can apply derived updates, and the value that
/// was stored.
pub type ChangeHandler = Box<dyn FnMut(&mut SceneGraph, ParamValue)>;

/// One live control bound to a field of a scene participant
pub struct Binding {
    /// Display label
    pub label: String,
    /// Owning participant
    pub owner: NodeKey,
    /// Bound field
    pub field: FieldRef,
    /// Input constraints
    pub control: Control,
    pub(crate) handlers: Vec<ChangeHandler>,
}

impl Binding {
    pub(crate) fn new(label: &str, owner: NodeKey, field: FieldRef, control: Control) -> Self {
        Self {
            label: label.to_string(),
            owner,
            field,
            control,
            handlers: Vec::new(),
        }
    }

    /// Number of change hooks attached
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("label", &self.label)
            .field("owner", &self.owner)
            .field("field", &self.field)
            .field("control", &self.control)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

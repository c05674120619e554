//! Specialized collection types

pub use slotmap::{new_key_type, SecondaryMap, SlotMap};

new_key_type! {
    /// Stable handle to a participant stored in the scene graph
    pub struct NodeKey;

    /// Stable handle to a control stored in the debug panel
    pub struct BindingId;
}

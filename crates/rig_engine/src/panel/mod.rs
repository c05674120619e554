//! Debug panel
//!
//! Registry of live controls bound to fields of lights, helpers and meshes.
//! Controls are grouped in collapsible folders. An edit goes through the
//! control's constraints, is written into the scene, and then runs the
//! binding's change hooks synchronously, once. Writing a field directly on
//! the scene bypasses the panel and runs no hooks.

pub mod binding;
pub mod effects;
pub mod fields;
pub mod folder;

use std::fmt::Write as _;

use thiserror::Error;

use crate::foundation::collections::{BindingId, NodeKey, SecondaryMap, SlotMap};
use crate::scene::SceneGraph;

pub use binding::{Binding, ChangeHandler, Control, FieldRef, ParamValue};
pub use effects::{wire_derived_effects, DerivedEffect};
pub use fields::{FieldAccess, FlagField, NumericField};
pub use folder::Folder;

/// Handle to a folder in the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FolderId(usize);

/// Errors raised by the debug panel
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    /// No control with this id, or no control with this folder/label
    #[error("Unknown control: {0}")]
    UnknownBinding(String),

    /// No folder with this name
    #[error("Unknown folder: {0}")]
    UnknownFolder(String),

    /// The bound participant no longer exists
    #[error("Control '{0}' points at a missing scene node")]
    OwnerMissing(String),

    /// The participant has no such field
    #[error("Field '{field}' is not available on '{owner}'")]
    FieldUnavailable {
        /// Field that was requested
        field: String,
        /// Participant label
        owner: String,
    },

    /// A numeric value was sent to a toggle or the reverse
    #[error("Control '{0}' does not accept this kind of value")]
    TypeMismatch(String),
}

/// Live parameter panel
#[derive(Debug, Default)]
pub struct DebugPanel {
    folders: Vec<Folder>,
    bindings: SlotMap<BindingId, Binding>,
    folder_of: SecondaryMap<BindingId, FolderId>,
}

impl DebugPanel {
    /// Create an empty panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a folder (collapsed) or return the existing one with that name
    pub fn add_folder(&mut self, name: &str) -> FolderId {
        if let Some(index) = self.folders.iter().position(|f| f.name() == name) {
            return FolderId(index);
        }
        self.folders.push(Folder::new(name));
        FolderId(self.folders.len() - 1)
    }

    /// Folder by id
    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.get(id.0)
    }

    /// Folder by name
    pub fn folder_named(&self, name: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.name() == name)
    }

    /// All folders in creation order
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Expand a folder by name
    pub fn open_folder(&mut self, name: &str) -> Result<(), PanelError> {
        self.folder_named_mut(name)?.open();
        Ok(())
    }

    /// Collapse a folder by name
    pub fn close_folder(&mut self, name: &str) -> Result<(), PanelError> {
        self.folder_named_mut(name)?.close();
        Ok(())
    }

    fn folder_named_mut(&mut self, name: &str) -> Result<&mut Folder, PanelError> {
        self.folders
            .iter_mut()
            .find(|f| f.name() == name)
            .ok_or_else(|| PanelError::UnknownFolder(name.to_string()))
    }

    fn register(&mut self, folder: FolderId, binding: Binding) -> Result<BindingId, PanelError> {
        let label = binding.label.clone();
        let folder_ref = self
            .folders
            .get_mut(folder.0)
            .ok_or_else(|| PanelError::UnknownFolder(format!("#{}", folder.0)))?;
        let id = self.bindings.insert(binding);
        folder_ref.push(id);
        self.folder_of.insert(id, folder);
        log::trace!("Panel control '{}/{}' created", folder_ref.name(), label);
        Ok(id)
    }

    /// Bind a slider to a numeric field of `owner`
    ///
    /// Fails when the owner does not exist or has no such field.
    #[allow(clippy::too_many_arguments)]
    pub fn bind_numeric(
        &mut self,
        scene: &SceneGraph,
        folder: FolderId,
        owner: NodeKey,
        field: NumericField,
        range: (f32, f32),
        step: f32,
        label: &str,
    ) -> Result<BindingId, PanelError> {
        debug_assert!(range.0 <= range.1, "slider range must be ordered");
        let node = scene
            .node(owner)
            .ok_or_else(|| PanelError::OwnerMissing(label.to_string()))?;
        if node.numeric(field).is_none() {
            return Err(PanelError::FieldUnavailable {
                field: field.to_string(),
                owner: node.label().to_string(),
            });
        }
        let control = Control::Slider {
            min: range.0,
            max: range.1,
            step,
        };
        self.register(
            folder,
            Binding::new(label, owner, FieldRef::Numeric(field), control),
        )
    }

    /// Bind a checkbox to a boolean field of `owner`
    pub fn bind_boolean(
        &mut self,
        scene: &SceneGraph,
        folder: FolderId,
        owner: NodeKey,
        field: FlagField,
        label: &str,
    ) -> Result<BindingId, PanelError> {
        let node = scene
            .node(owner)
            .ok_or_else(|| PanelError::OwnerMissing(label.to_string()))?;
        if node.flag(field).is_none() {
            return Err(PanelError::FieldUnavailable {
                field: field.to_string(),
                owner: node.label().to_string(),
            });
        }
        self.register(
            folder,
            Binding::new(label, owner, FieldRef::Flag(field), Control::Toggle),
        )
    }

    /// Attach a hook that runs after every edit made through this control
    pub fn on_change(&mut self, id: BindingId, handler: ChangeHandler) -> Result<(), PanelError> {
        let binding = self.binding_mut(id)?;
        binding.handlers.push(handler);
        Ok(())
    }

    /// Control by id
    pub fn binding(&self, id: BindingId) -> Result<&Binding, PanelError> {
        self.bindings
            .get(id)
            .ok_or_else(|| PanelError::UnknownBinding(format!("{id:?}")))
    }

    fn binding_mut(&mut self, id: BindingId) -> Result<&mut Binding, PanelError> {
        self.bindings
            .get_mut(id)
            .ok_or_else(|| PanelError::UnknownBinding(format!("{id:?}")))
    }

    /// All controls with their ids
    pub fn bindings(&self) -> impl Iterator<Item = (BindingId, &Binding)> + '_ {
        self.bindings.iter()
    }

    /// Find a control by folder name and label
    pub fn find(&self, folder: &str, label: &str) -> Result<BindingId, PanelError> {
        let folder_ref = self
            .folder_named(folder)
            .ok_or_else(|| PanelError::UnknownFolder(folder.to_string()))?;
        folder_ref
            .bindings()
            .iter()
            .copied()
            .find(|&id| self.bindings.get(id).is_some_and(|b| b.label == label))
            .ok_or_else(|| PanelError::UnknownBinding(format!("{folder}/{label}")))
    }

    /// Current value of the bound field
    pub fn value(&self, scene: &SceneGraph, id: BindingId) -> Result<ParamValue, PanelError> {
        let binding = self.binding(id)?;
        let node = scene
            .node(binding.owner)
            .ok_or_else(|| PanelError::OwnerMissing(binding.label.clone()))?;
        let unavailable = |field: String| PanelError::FieldUnavailable {
            field,
            owner: node.label().to_string(),
        };
        match binding.field {
            FieldRef::Numeric(field) => node
                .numeric(field)
                .map(ParamValue::Number)
                .ok_or_else(|| unavailable(field.to_string())),
            FieldRef::Flag(field) => node
                .flag(field)
                .map(ParamValue::Flag)
                .ok_or_else(|| unavailable(field.to_string())),
        }
    }

    /// Edit a control with a value of either kind
    ///
    /// Returns the value actually stored.
    pub fn edit(
        &mut self,
        scene: &mut SceneGraph,
        id: BindingId,
        value: ParamValue,
    ) -> Result<ParamValue, PanelError> {
        match value {
            ParamValue::Number(number) => self.set_number(scene, id, number).map(ParamValue::Number),
            ParamValue::Flag(flag) => self.set_flag(scene, id, flag).map(ParamValue::Flag),
        }
    }

    /// Move a slider; the stored value is snapped and clamped to the
    /// control's range. Returns the stored value.
    pub fn set_number(
        &mut self,
        scene: &mut SceneGraph,
        id: BindingId,
        raw: f32,
    ) -> Result<f32, PanelError> {
        let binding = self.binding_mut(id)?;
        let FieldRef::Numeric(field) = binding.field else {
            return Err(PanelError::TypeMismatch(binding.label.clone()));
        };
        let stored = binding.control.constrain(raw);
        let node = scene
            .node_mut(binding.owner)
            .ok_or_else(|| PanelError::OwnerMissing(binding.label.clone()))?;
        let owner = node.label().to_string();
        let slot = node
            .numeric_mut(field)
            .ok_or_else(|| PanelError::FieldUnavailable {
                field: field.to_string(),
                owner: owner.clone(),
            })?;
        *slot = stored;
        log::debug!("Panel: {owner}.{field} = {stored:.3} (requested {raw:.3})");

        for handler in &mut binding.handlers {
            handler(scene, ParamValue::Number(stored));
        }
        Ok(stored)
    }

    /// Set a checkbox. Returns the stored value.
    pub fn set_flag(
        &mut self,
        scene: &mut SceneGraph,
        id: BindingId,
        value: bool,
    ) -> Result<bool, PanelError> {
        let binding = self.binding_mut(id)?;
        let FieldRef::Flag(field) = binding.field else {
            return Err(PanelError::TypeMismatch(binding.label.clone()));
        };
        let node = scene
            .node_mut(binding.owner)
            .ok_or_else(|| PanelError::OwnerMissing(binding.label.clone()))?;
        let owner = node.label().to_string();
        let slot = node
            .flag_mut(field)
            .ok_or_else(|| PanelError::FieldUnavailable {
                field: field.to_string(),
                owner: owner.clone(),
            })?;
        *slot = value;
        log::debug!("Panel: {owner}.{field} = {value}");

        for handler in &mut binding.handlers {
            handler(scene, ParamValue::Flag(value));
        }
        Ok(value)
    }

    /// Flip a checkbox. Returns the new value.
    pub fn toggle(&mut self, scene: &mut SceneGraph, id: BindingId) -> Result<bool, PanelError> {
        match self.value(scene, id)? {
            ParamValue::Flag(current) => self.set_flag(scene, id, !current),
            ParamValue::Number(_) => Err(PanelError::TypeMismatch(self.binding(id)?.label.clone())),
        }
    }

    /// Text listing of every folder and control with current values
    pub fn describe(&self, scene: &SceneGraph) -> String {
        let mut out = String::new();
        for folder in &self.folders {
            let marker = if folder.is_collapsed() { '+' } else { '-' };
            let _ = writeln!(out, "[{marker}] {}", folder.name());
            if folder.is_collapsed() {
                continue;
            }
            for &id in folder.bindings() {
                let Some(binding) = self.bindings.get(id) else {
                    continue;
                };
                let value = self
                    .value(scene, id)
                    .map_or_else(|e| e.to_string(), |v| v.to_string());
                match binding.control {
                    Control::Slider { min, max, step } => {
                        let _ = writeln!(
                            out,
                            "    {:<24} {value} [{min}..{max} step {step}]",
                            binding.label
                        );
                    }
                    Control::Toggle => {
                        let _ = writeln!(out, "    {:<24} {value}", binding.label);
                    }
                }
            }
        }
        out
    }

    /// Folder a control belongs to
    pub fn folder_of(&self, id: BindingId) -> Option<FolderId> {
        self.folder_of.get(id).copied()
    }
}

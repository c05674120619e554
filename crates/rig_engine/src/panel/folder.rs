//! Collapsible groups of controls

use crate::foundation::collections::BindingId;

/// Named group of controls, one per light
#[derive(Debug, Clone)]
pub struct Folder {
    name: String,
    collapsed: bool,
    bindings: Vec<BindingId>,
}

impl Folder {
    /// Create a collapsed, empty folder
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            collapsed: true,
            bindings: Vec::new(),
        }
    }

    /// Folder name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the folder is shown collapsed
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Expand the folder
    pub fn open(&mut self) {
        self.collapsed = false;
    }

    /// Collapse the folder
    pub fn close(&mut self) {
        self.collapsed = true;
    }

    /// Controls in display order
    pub fn bindings(&self) -> &[BindingId] {
        &self.bindings
    }

    pub(crate) fn push(&mut self, id: BindingId) {
        self.bindings.push(id);
    }
}

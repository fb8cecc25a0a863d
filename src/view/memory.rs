//! In-memory templates.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{interpolate, View, ViewData};
use crate::error::ViewError;

/// A view whose templates are registered at runtime.
#[derive(Debug, Default)]
pub struct MemoryView {
    templates: RwLock<HashMap<String, String>>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, builder style.
    pub fn with_template(self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    /// Register or replace a template.
    pub fn insert(&self, name: impl Into<String>, source: impl Into<String>) {
        self.templates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), source.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }
}

impl View for MemoryView {
    fn render(&self, template: &str, data: &ViewData) -> Result<String, ViewError> {
        let templates = self.templates.read().unwrap_or_else(PoisonError::into_inner);
        let source = templates
            .get(template)
            .ok_or_else(|| ViewError::template_not_found(template))?;
        interpolate(template, source, data)
    }
}

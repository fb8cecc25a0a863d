//! Controller registry - action tables for every controller type.
//!
//! This module handles:
//! - Building each controller type's action table once
//! - Handing the table to concurrent requests
//! - Listing registered controllers and their actions

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;

use super::action::ActionTable;
use super::controller::Controller;

/// Controller metadata for routing and introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerInfo {
    pub name: String,            // "Posts"
    pub type_name: &'static str, // "my_app::controllers::PostsController"
    pub actions: Vec<String>,
}

#[derive(Default)]
struct Tables {
    by_type: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    /// Keyed by type name; short names may repeat across modules
    info: IndexMap<&'static str, ControllerInfo>,
}

/// Registry of controllers, keyed by type.
///
/// Tables are built from [`Controller::actions`] the first time a type is
/// registered or dispatched to, then shared.
#[derive(Default)]
pub struct ControllerRegistry {
    tables: RwLock<Tables>,
}

impl ControllerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller type, building its action table.
    ///
    /// Registering a type twice returns the existing table.
    pub fn register<C: Controller>(&self) -> Arc<ActionTable<C>> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(table) = tables
            .by_type
            .get(&TypeId::of::<C>())
            .and_then(|t| Arc::clone(t).downcast::<ActionTable<C>>().ok())
        {
            return table;
        }

        let mut table = ActionTable::new();
        C::actions(&mut table);
        let table = Arc::new(table);

        let info = ControllerInfo {
            name: C::controller_name(),
            type_name: type_name::<C>(),
            actions: table.names().map(str::to_string).collect(),
        };
        log::info!(
            "Registered controller: {} with actions: {:?}",
            info.name,
            info.actions
        );

        if let Some(existing) = tables.info.values().find(|c| c.name == info.name) {
            log::warn!(
                "Controller name {} is shared by {} and {}; lookups by name resolve to {}",
                info.name,
                existing.type_name,
                info.type_name,
                existing.type_name
            );
        }
        tables.info.insert(info.type_name, info);
        tables.by_type.insert(TypeId::of::<C>(), table.clone());
        table
    }

    /// The action table for `C`, registering the type on first use.
    pub fn table<C: Controller>(&self) -> Arc<ActionTable<C>> {
        let existing = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_type
            .get(&TypeId::of::<C>())
            .cloned();

        match existing.and_then(|t| t.downcast::<ActionTable<C>>().ok()) {
            Some(table) => table,
            None => self.register::<C>(),
        }
    }

    pub fn is_registered<C: Controller>(&self) -> bool {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_type
            .contains_key(&TypeId::of::<C>())
    }

    /// Get a controller by name (e.g., "Posts" for PostsController).
    ///
    /// When several types share a name, the first one registered wins.
    pub fn get(&self, name: &str) -> Option<ControllerInfo> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .info
            .values()
            .find(|c| c.name == name)
            .cloned()
    }

    /// Get a controller by its full type name.
    pub fn get_by_type_name(&self, type_name: &str) -> Option<ControllerInfo> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .info
            .get(type_name)
            .cloned()
    }

    /// Get all action names for a controller.
    pub fn get_actions(&self, name: &str) -> Vec<String> {
        self.get(name).map(|c| c.actions).unwrap_or_default()
    }

    /// Get all controllers, sorted by name, then type name.
    pub fn all(&self) -> Vec<ControllerInfo> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<ControllerInfo> = tables.info.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.type_name.cmp(b.type_name)));
        all
    }

    pub fn len(&self) -> usize {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .info
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("controllers", &self.all())
            .finish()
    }
}

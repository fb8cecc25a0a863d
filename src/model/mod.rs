//! Model registry hand-off.
//!
//! Controllers fetch persistence models by alias through a [`ModelRegistry`].
//! Querying and persistence live behind the [`Model`] trait and are not this
//! crate's concern; [`ModelTable`] is a registry of shared model instances.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::ModelError;

/// A persistence model resolved by alias.
pub trait Model: Any + Send + Sync {
    /// The alias this model is registered under (e.g. "Posts").
    fn alias(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// Resolves a model alias to a model instance.
pub trait ModelRegistry: Send + Sync {
    fn resolve(&self, alias: &str) -> Result<Arc<dyn Model>, ModelError>;
}

/// Registry of model instances keyed by alias.
#[derive(Default)]
pub struct ModelTable {
    models: RwLock<HashMap<String, Arc<dyn Model>>>,
}

impl ModelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under its own alias, replacing any previous one.
    pub fn register(&self, model: Arc<dyn Model>) {
        let alias = model.alias().to_string();
        self.models
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(alias, model);
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(alias)
    }
}

impl ModelRegistry for ModelTable {
    fn resolve(&self, alias: &str) -> Result<Arc<dyn Model>, ModelError> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(alias)
            .cloned()
            .ok_or_else(|| ModelError::not_found(alias))
    }
}

impl std::fmt::Debug for ModelTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let models = self.models.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("ModelTable")
            .field("aliases", &models.keys().collect::<Vec<_>>())
            .finish()
    }
}

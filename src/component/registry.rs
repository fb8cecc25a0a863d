//! Component registry - resolves component names across namespaces.
//!
//! This module handles:
//! - Keeping the ordered list of namespaces components are searched in
//! - Keeping the table of component types known to the process
//! - Memoizing name resolutions, including misses
//! - Constructing component instances for controllers

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use super::component::{Component, ComponentBase, ComponentType};
use crate::controller::ControllerHandle;
use crate::error::ControllerError;

/// Appended to a component name to form the type name probed in each namespace.
pub const COMPONENT_SUFFIX: &str = "Component";

const DELIMITER: &str = "::";

type ComponentFactory = fn(ControllerHandle, &Value) -> Box<dyn Component>;

fn construct<T: ComponentType>(controller: ControllerHandle, options: &Value) -> Box<dyn Component> {
    Box::new(T::build(ComponentBase::new(
        controller,
        &T::defaults(),
        options,
    )))
}

/// Normalize a namespace: strip delimiters from both ends, then wrap it in
/// `::` on both sides. An empty namespace is the root, `::`.
///
/// - `app::components` → `::app::components::`
/// - `::app::components::` → `::app::components::`
/// - `` → `::`
pub fn normalize_namespace(namespace: &str) -> String {
    let trimmed = namespace.trim_matches(':');
    if trimmed.is_empty() {
        DELIMITER.to_string()
    } else {
        format!("{}{}{}", DELIMITER, trimmed, DELIMITER)
    }
}

#[derive(Default)]
struct RegistryState {
    /// Search namespaces in priority order
    namespaces: Vec<String>,
    /// Resolution cache (name -> fully-qualified type name, or None for a miss)
    resolved: HashMap<String, Option<String>>,
    /// Known component types (fully-qualified type name -> factory)
    types: HashMap<String, ComponentFactory>,
}

/// Process-wide component registry.
///
/// Shared between requests behind an `Arc`; all mutation is serialized by an
/// internal lock. A resolved name stays cached until [`forget`] or [`clear`],
/// including names that resolved to nothing: adding a namespace later does
/// not revive a cached miss.
///
/// [`forget`]: ComponentRegistry::forget
/// [`clear`]: ComponentRegistry::clear
#[derive(Default)]
pub struct ComponentRegistry {
    state: RwLock<RegistryState>,
    probes: AtomicUsize,
}

impl ComponentRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make a component type known under `namespace`.
    ///
    /// Returns the fully-qualified type name. Cached resolutions are left
    /// alone.
    pub fn define<T: ComponentType>(&self, namespace: &str) -> String {
        let type_name = format!("{}{}", normalize_namespace(namespace), T::TYPE_NAME);
        log::debug!("Defined component type {}", type_name);
        self.write()
            .types
            .insert(type_name.clone(), construct::<T> as ComponentFactory);
        type_name
    }

    /// Check whether a fully-qualified component type is known.
    pub fn is_defined(&self, type_name: &str) -> bool {
        self.read().types.contains_key(type_name)
    }

    /// Add a namespace for loading components. Duplicates are ignored.
    pub fn add_namespace(&self, namespace: &str) {
        let namespace = normalize_namespace(namespace);
        let mut state = self.write();
        if !state.namespaces.contains(&namespace) {
            log::debug!("Added component namespace {}", namespace);
            state.namespaces.push(namespace);
        }
    }

    /// Remove a namespace. Returns whether it was registered.
    pub fn remove_namespace(&self, namespace: &str) -> bool {
        let namespace = normalize_namespace(namespace);
        let mut state = self.write();
        match state.namespaces.iter().position(|ns| *ns == namespace) {
            Some(index) => {
                state.namespaces.remove(index);
                log::debug!("Removed component namespace {}", namespace);
                true
            }
            None => false,
        }
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        let namespace = normalize_namespace(namespace);
        self.read().namespaces.contains(&namespace)
    }

    /// The registered namespaces, in priority order.
    pub fn namespaces(&self) -> Vec<String> {
        self.read().namespaces.clone()
    }

    /// Clear all namespaces and cached resolutions.
    pub fn clear(&self) {
        let mut state = self.write();
        state.namespaces.clear();
        state.resolved.clear();
        log::debug!("Cleared component namespaces and resolutions");
    }

    /// Drop the cached resolution for one name. Returns whether one existed.
    pub fn forget(&self, name: &str) -> bool {
        self.write().resolved.remove(name).is_some()
    }

    /// Find the fully-qualified type name for a component name.
    pub fn find(&self, name: &str) -> Option<String> {
        let cached = self.read().resolved.get(name).cloned();
        if let Some(resolved) = cached {
            return resolved;
        }

        let mut state = self.write();
        // Another thread may have resolved it while we waited for the lock.
        if let Some(resolved) = state.resolved.get(name) {
            return resolved.clone();
        }

        let located = self.locate(&state, name);
        match &located {
            Some(type_name) => log::debug!("Resolved component {} to {}", name, type_name),
            None => log::debug!("Component {} not found in {:?}", name, state.namespaces),
        }
        state.resolved.insert(name.to_string(), located.clone());
        located
    }

    /// Probe each namespace in order for `name`.
    fn locate(&self, state: &RegistryState, name: &str) -> Option<String> {
        self.probes.fetch_add(1, Ordering::Relaxed);
        state
            .namespaces
            .iter()
            .map(|namespace| format!("{}{}{}", namespace, name, COMPONENT_SUFFIX))
            .find(|candidate| state.types.contains_key(candidate))
    }

    /// Number of probing passes run so far (cache misses in [`find`]).
    ///
    /// [`find`]: ComponentRegistry::find
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::Relaxed)
    }

    /// Construct a new component instance for `controller`.
    ///
    /// Every call builds a fresh instance.
    pub fn load(
        &self,
        name: &str,
        controller: ControllerHandle,
        options: &Value,
    ) -> Result<Box<dyn Component>, ControllerError> {
        let type_name = self
            .find(name)
            .ok_or_else(|| ControllerError::component_not_found(name))?;

        let factory = self
            .read()
            .types
            .get(&type_name)
            .copied()
            .ok_or_else(|| ControllerError::component_not_found(name))?;

        log::debug!("Loading component {} ({})", name, type_name);
        Ok(factory(controller, options))
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("ComponentRegistry")
            .field("namespaces", &state.namespaces)
            .field("resolved", &state.resolved)
            .field("types", &state.types.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::any::Any;
    use std::sync::Arc;
    use std::thread;

    struct TestComponent {
        base: ComponentBase,
    }

    impl TestComponent {
        fn value(&self) -> i64 {
            1
        }
    }

    impl Component for TestComponent {
        fn base(&self) -> &ComponentBase {
            &self.base
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    impl ComponentType for TestComponent {
        const TYPE_NAME: &'static str = "TestComponent";

        fn defaults() -> Value {
            json!({"enabled": true, "limits": {"max": 10}})
        }

        fn build(base: ComponentBase) -> Self {
            Self { base }
        }
    }

    fn registry() -> ComponentRegistry {
        let registry = ComponentRegistry::new();
        registry.define::<TestComponent>("tests::mock::components");
        registry.add_namespace("tests::mock::components");
        registry
    }

    #[test]
    fn test_normalize_namespace() {
        assert_eq!(normalize_namespace("app::components"), "::app::components::");
        assert_eq!(normalize_namespace("::app::components"), "::app::components::");
        assert_eq!(normalize_namespace("app::components::"), "::app::components::");
        assert_eq!(normalize_namespace(""), "::");
        assert_eq!(normalize_namespace("::"), "::");
    }

    #[test]
    fn test_find() {
        assert_eq!(
            registry().find("Test").as_deref(),
            Some("::tests::mock::components::TestComponent")
        );
    }

    #[test]
    fn test_find_invalid() {
        assert_eq!(registry().find("Invalid"), None);
    }

    #[test]
    fn test_load() {
        let component = registry()
            .load("Test", ControllerHandle::detached(), &Value::Null)
            .unwrap();
        let test = component.as_any().downcast_ref::<TestComponent>().unwrap();
        assert_eq!(test.value(), 1);
        assert_eq!(test.config(), &json!({"enabled": true, "limits": {"max": 10}}));
    }

    #[test]
    fn test_load_merges_options() {
        let component = registry()
            .load(
                "Test",
                ControllerHandle::detached(),
                &json!({"limits": {"min": 1}}),
            )
            .unwrap();
        assert_eq!(
            component.config(),
            &json!({"enabled": true, "limits": {"max": 10, "min": 1}})
        );
    }

    #[test]
    fn test_load_builds_fresh_instances() {
        let registry = registry();
        let a = registry
            .load("Test", ControllerHandle::detached(), &json!({"enabled": false}))
            .unwrap();
        let b = registry
            .load("Test", ControllerHandle::detached(), &Value::Null)
            .unwrap();
        assert_eq!(a.config()["enabled"], json!(false));
        assert_eq!(b.config()["enabled"], json!(true));
    }

    #[test]
    fn test_load_invalid() {
        let err = registry()
            .load("Invalid", ControllerHandle::detached(), &Value::Null)
            .err()
            .unwrap();
        assert!(matches!(err, ControllerError::ComponentNotFound(ref n) if n == "Invalid"));
    }

    #[test]
    fn test_namespace_no_leading_delimiter() {
        let registry = registry();
        registry.clear();
        registry.add_namespace("tests::mock::components");
        assert!(registry
            .load("Test", ControllerHandle::detached(), &Value::Null)
            .is_ok());
    }

    #[test]
    fn test_namespace_trailing_delimiter() {
        let registry = registry();
        registry.clear();
        registry.add_namespace("::tests::mock::components::");
        assert!(registry
            .load("Test", ControllerHandle::detached(), &Value::Null)
            .is_ok());
    }

    #[test]
    fn test_equivalent_namespaces_are_stored_once() {
        let registry = ComponentRegistry::new();
        registry.add_namespace("app::components");
        registry.add_namespace("::app::components::");
        registry.add_namespace("app::components::");
        assert_eq!(registry.namespaces(), vec!["::app::components::".to_string()]);
    }

    #[test]
    fn test_namespace_order_is_priority() {
        struct Shadow {
            base: ComponentBase,
        }
        impl Component for Shadow {
            fn base(&self) -> &ComponentBase {
                &self.base
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }
        impl ComponentType for Shadow {
            const TYPE_NAME: &'static str = "TestComponent";
            fn build(base: ComponentBase) -> Self {
                Self { base }
            }
        }

        let registry = ComponentRegistry::new();
        registry.define::<TestComponent>("framework");
        registry.define::<Shadow>("app");
        registry.add_namespace("app");
        registry.add_namespace("framework");

        assert_eq!(registry.find("Test").as_deref(), Some("::app::TestComponent"));
        let component = registry
            .load("Test", ControllerHandle::detached(), &Value::Null)
            .unwrap();
        assert!(component.as_any().is::<Shadow>());
    }

    #[test]
    fn test_remove_namespace() {
        let registry = ComponentRegistry::new();
        registry.add_namespace("a");
        registry.add_namespace("b");
        registry.add_namespace("c");

        assert!(registry.remove_namespace("::b"));
        assert!(!registry.remove_namespace("b"));
        assert_eq!(registry.namespaces(), vec!["::a::", "::c::"]);
        assert!(registry.has_namespace("c::"));
        assert!(!registry.has_namespace("b"));
    }

    #[test]
    fn test_find_is_cached() {
        let registry = registry();
        let before = registry.probe_count();

        let first = registry.find("Test");
        let second = registry.find("Test");
        assert_eq!(first, second);
        assert_eq!(registry.probe_count(), before + 1);

        assert_eq!(registry.find("Invalid"), None);
        assert_eq!(registry.find("Invalid"), None);
        assert_eq!(registry.probe_count(), before + 2);
    }

    #[test]
    fn test_cached_miss_survives_new_namespace() {
        // A miss stays cached until forgotten or cleared.
        let registry = ComponentRegistry::new();
        registry.define::<TestComponent>("late");
        assert_eq!(registry.find("Test"), None);

        registry.add_namespace("late");
        assert_eq!(registry.find("Test"), None);

        assert!(registry.forget("Test"));
        assert_eq!(registry.find("Test").as_deref(), Some("::late::TestComponent"));
    }

    #[test]
    fn test_clear_resets_namespaces_and_cache() {
        let registry = registry();
        assert!(registry.find("Test").is_some());

        registry.clear();
        assert!(registry.namespaces().is_empty());
        assert_eq!(registry.find("Test"), None);
        assert!(registry.is_defined("::tests::mock::components::TestComponent"));
    }

    #[test]
    fn test_concurrent_find_and_namespace_changes() {
        let registry = Arc::new(registry());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for j in 0..100 {
                        if i % 2 == 0 {
                            assert_eq!(
                                registry.find("Test").as_deref(),
                                Some("::tests::mock::components::TestComponent")
                            );
                        } else {
                            let ns = format!("extra{}::n{}", i, j);
                            registry.add_namespace(&ns);
                            assert!(registry.remove_namespace(&ns));
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.namespaces(), vec!["::tests::mock::components::"]);
        assert_eq!(registry.probe_count(), 1);
    }
}

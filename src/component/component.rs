//! The contract every loadable component implements.

use std::any::Any;

use serde_json::Value;

use crate::controller::ControllerHandle;

/// Common state of every component: its controller and merged config.
#[derive(Debug, Clone)]
pub struct ComponentBase {
    controller: ControllerHandle,
    config: Value,
}

impl ComponentBase {
    /// Build the base, recursively overriding `defaults` with `options`.
    ///
    /// A `null` `options` means no overrides.
    pub fn new(controller: ControllerHandle, defaults: &Value, options: &Value) -> Self {
        let config = if options.is_null() {
            defaults.clone()
        } else {
            merge_config(defaults, options)
        };
        Self { controller, config }
    }

    pub fn controller(&self) -> &ControllerHandle {
        &self.controller
    }

    pub fn config(&self) -> &Value {
        &self.config
    }
}

/// A behavior attached to a controller.
pub trait Component: Any {
    fn base(&self) -> &ComponentBase;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The effective configuration.
    fn config(&self) -> &Value {
        self.base().config()
    }

    /// The owning controller.
    fn controller(&self) -> &ControllerHandle {
        self.base().controller()
    }
}

/// A concrete component type the registry can construct.
pub trait ComponentType: Component + Sized {
    /// The type's name within its namespace, e.g. "FlashComponent".
    const TYPE_NAME: &'static str;

    /// Declared configuration defaults.
    fn defaults() -> Value {
        Value::Object(serde_json::Map::new())
    }

    fn build(base: ComponentBase) -> Self;
}

/// Recursively replace values in `defaults` with those in `options`.
///
/// Objects merge key by key and arrays merge index by index; any other
/// value in `options` replaces the default outright.
pub fn merge_config(defaults: &Value, options: &Value) -> Value {
    match (defaults, options) {
        (Value::Object(base), Value::Object(overrides)) => {
            let mut merged = base.clone();
            for (key, value) in overrides {
                let next = match base.get(key) {
                    Some(existing) => merge_config(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (Value::Array(base), Value::Array(overrides)) => {
            let mut merged = base.clone();
            for (i, value) in overrides.iter().enumerate() {
                match base.get(i) {
                    Some(existing) => merged[i] = merge_config(existing, value),
                    None => merged.push(value.clone()),
                }
            }
            Value::Array(merged)
        }
        (_, value) => value.clone(),
    }
}

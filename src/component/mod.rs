//! Components: reusable behaviors attached to controllers by name.
//!
//! A component is looked up in the [`ComponentRegistry`] by its short name
//! ("Auth", "Flash"), across the registered namespaces in priority order. The
//! first namespace that holds a matching type wins:
//!
//! ```text
//! namespaces:  ::app::components::   ::soli::components::
//! load("Flash") probes ::app::components::FlashComponent
//!               then   ::soli::components::FlashComponent
//! ```
//!
//! Each instance keeps a weak handle to its controller and a configuration
//! built from the type's defaults, recursively overridden by the options
//! passed at load time.
//!
//! # Example
//!
//! ```rust
//! use serde_json::{json, Value};
//! use soli_controller::component::{Component, ComponentBase, ComponentRegistry, ComponentType};
//!
//! struct FlashComponent {
//!     base: ComponentBase,
//! }
//!
//! impl Component for FlashComponent {
//!     fn base(&self) -> &ComponentBase {
//!         &self.base
//!     }
//!
//!     fn as_any(&self) -> &dyn std::any::Any {
//!         self
//!     }
//!
//!     fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
//!         self
//!     }
//! }
//!
//! impl ComponentType for FlashComponent {
//!     const TYPE_NAME: &'static str = "FlashComponent";
//!
//!     fn defaults() -> Value {
//!         json!({"key": "flash"})
//!     }
//!
//!     fn build(base: ComponentBase) -> Self {
//!         Self { base }
//!     }
//! }
//!
//! let registry = ComponentRegistry::new();
//! registry.define::<FlashComponent>("app::components");
//! registry.add_namespace("app::components");
//! assert_eq!(
//!     registry.find("Flash").as_deref(),
//!     Some("::app::components::FlashComponent")
//! );
//! ```

pub mod component;
pub mod registry;

pub use component::{merge_config, Component, ComponentBase, ComponentType};
pub use registry::{normalize_namespace, ComponentRegistry, COMPONENT_SUFFIX};

//! soli-controller: the request-dispatch core of the Soli MVC stack.
//!
//! This is the library root that exports all modules.
//!
//! # Request lifecycle
//!
//! - A [`Dispatcher`](controller::Dispatcher) is created per request from the
//!   shared [`AppContext`](app::AppContext)
//! - Components are attached by name through the
//!   [`ComponentRegistry`](component::ComponentRegistry)
//! - One action is invoked, which renders a view or replaces the response
//! - The response is handed back to the HTTP server with
//!   [`ClientResponse::into_hyper`](http::ClientResponse::into_hyper)

// Allow some clippy lints that are stylistic and not critical
#![allow(clippy::module_inception)]
#![allow(clippy::result_large_err)]
#![allow(clippy::type_complexity)]
#![allow(clippy::new_without_default)]
#![allow(clippy::let_and_return)]
#![allow(clippy::unnecessary_lazy_evaluations)]

pub mod app;
pub mod component;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod model;
pub mod view;

pub use app::AppContext;
pub use component::{Component, ComponentBase, ComponentRegistry, ComponentType};
pub use config::AppConfig;
pub use controller::{
    ActionArgs, ActionOutcome, ActionResult, ActionTable, Controller, ControllerHandle,
    ControllerRegistry, Dispatcher,
};
pub use error::{ConfigError, ControllerError, ModelError, ViewError};
pub use http::{ClientResponse, ServerRequest};
pub use model::{Model, ModelRegistry, ModelTable};
pub use view::{FileView, MemoryView, View, ViewData};

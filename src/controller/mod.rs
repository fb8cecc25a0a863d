//! Controllers: per-request dispatch of named actions.
//!
//! A controller type embeds a [`Dispatcher`] and declares its actions once in
//! [`Controller::actions`]. The [`ControllerRegistry`] builds that table the
//! first time the type is dispatched to and shares it across requests.
//!
//! Invoking an action:
//! 1. looks the name up in the action table (refusing anything unregistered)
//! 2. runs the before hooks
//! 3. runs the action
//! 4. auto renders `{name}/{action}` when the action produced no response
//! 5. runs the after hooks

pub mod action;
pub mod controller;
pub mod dispatcher;
pub mod naming;
pub mod registry;


pub use action::{ActionArgs, ActionFn, ActionOutcome, ActionResult, ActionTable, HookFn, BASE_METHODS};
pub use controller::Controller;
pub use dispatcher::{ControllerHandle, DispatchState, Dispatcher};
pub use naming::{controller_name_from_type, default_template, humanize};
pub use registry::{ControllerInfo, ControllerRegistry};

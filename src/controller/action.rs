//! Action tables: which methods of a controller may be invoked as actions.
//!
//! Only names registered through [`ActionTable::action`] are invokable.
//! Helper methods are simply never registered, and names of the base
//! controller contract ([`BASE_METHODS`]) are refused both at registration and
//! at lookup, so framework plumbing like `response` or `render` can never be
//! reached as a page action.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::ControllerError;
use crate::http::ClientResponse;

/// Methods provided by the base `Controller` contract.
pub const BASE_METHODS: &[&str] = &[
    "actions",
    "component",
    "component_as",
    "component_as_mut",
    "controller_name",
    "data",
    "dispatcher",
    "dispatcher_mut",
    "enable_auto_render",
    "fetch_model",
    "into_response",
    "invoke_action",
    "load_component",
    "name",
    "render",
    "request",
    "response",
    "set",
    "set_data",
    "set_template",
    "template",
    "view",
];

/// What an action (or hook) hands back to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActionOutcome {
    /// Carry on: auto render if enabled and nothing was written yet.
    #[default]
    Continue,
    /// Replace the controller's response with this one and stop rendering.
    Respond(ClientResponse),
}

impl From<()> for ActionOutcome {
    fn from(_: ()) -> Self {
        Self::Continue
    }
}

impl From<ClientResponse> for ActionOutcome {
    fn from(response: ClientResponse) -> Self {
        Self::Respond(response)
    }
}

pub type ActionResult = Result<ActionOutcome, ControllerError>;

/// An action handler.
pub type ActionFn<C> = fn(&mut C, ActionArgs<'_>) -> ActionResult;

/// A before/after hook. Receives the action name.
pub type HookFn<C> = fn(&mut C, &str) -> ActionResult;

/// Positional arguments for one action invocation.
#[derive(Debug, Clone, Copy)]
pub struct ActionArgs<'a> {
    action: &'a str,
    values: &'a [Value],
}

impl<'a> ActionArgs<'a> {
    pub fn new(action: &'a str, values: &'a [Value]) -> Self {
        Self { action, values }
    }

    pub fn action(&self) -> &'a str {
        self.action
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index)
    }

    pub fn as_slice(&self) -> &'a [Value] {
        self.values
    }

    /// A required argument.
    pub fn value(&self, index: usize) -> Result<&'a Value, ControllerError> {
        self.get(index)
            .ok_or_else(|| ControllerError::missing_argument(self.action, index))
    }

    pub fn str(&self, index: usize) -> Result<&'a str, ControllerError> {
        self.value(index)?
            .as_str()
            .ok_or_else(|| ControllerError::invalid_argument(self.action, index, "string"))
    }

    pub fn i64(&self, index: usize) -> Result<i64, ControllerError> {
        let value = self.value(index)?;
        // Route params usually arrive as strings.
        value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
            .ok_or_else(|| ControllerError::invalid_argument(self.action, index, "integer"))
    }

    pub fn bool(&self, index: usize) -> Result<bool, ControllerError> {
        self.value(index)?
            .as_bool()
            .ok_or_else(|| ControllerError::invalid_argument(self.action, index, "boolean"))
    }
}

/// Before/after action hook.
struct Hook<C> {
    actions: Vec<String>, // Empty = all actions
    handler: HookFn<C>,
}

impl<C> Hook<C> {
    fn applies_to(&self, action: &str) -> bool {
        self.actions.is_empty() || self.actions.iter().any(|a| a == action)
    }
}

/// The invokable actions and hooks of one controller type.
pub struct ActionTable<C> {
    actions: IndexMap<String, ActionFn<C>>,
    before_actions: Vec<Hook<C>>,
    after_actions: Vec<Hook<C>>,
}

impl<C> Default for ActionTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that `name` can name an action.
fn is_action_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('_') && !BASE_METHODS.contains(&name)
}

impl<C> ActionTable<C> {
    pub fn new() -> Self {
        Self {
            actions: IndexMap::new(),
            before_actions: Vec::new(),
            after_actions: Vec::new(),
        }
    }

    /// Register a public action.
    ///
    /// Names of base controller methods, and names starting with `_`, are
    /// refused. Debug builds panic on them.
    pub fn action(&mut self, name: &str, handler: ActionFn<C>) -> &mut Self {
        if is_action_name(name) {
            self.actions.insert(name.to_string(), handler);
        } else {
            log::warn!("Refusing to register '{}' as an action", name);
            debug_assert!(
                is_action_name(name),
                "'{}' is reserved and cannot be registered as an action",
                name
            );
        }
        self
    }

    /// Run `hook` before the listed actions (all actions if empty).
    pub fn before_action(&mut self, actions: &[&str], hook: HookFn<C>) -> &mut Self {
        self.before_actions.push(Hook {
            actions: actions.iter().map(|a| a.to_string()).collect(),
            handler: hook,
        });
        self
    }

    /// Run `hook` after the listed actions (all actions if empty).
    pub fn after_action(&mut self, actions: &[&str], hook: HookFn<C>) -> &mut Self {
        self.after_actions.push(Hook {
            actions: actions.iter().map(|a| a.to_string()).collect(),
            handler: hook,
        });
        self
    }

    /// Look up an invokable action.
    pub fn lookup(&self, name: &str) -> Option<ActionFn<C>> {
        if !is_action_name(name) {
            return None;
        }
        self.actions.get(name).copied()
    }

    pub fn is_invokable(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Action names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub(crate) fn before_hooks<'a>(&'a self, action: &'a str) -> impl Iterator<Item = HookFn<C>> + 'a {
        self.before_actions
            .iter()
            .filter(move |h| h.applies_to(action))
            .map(|h| h.handler)
    }

    pub(crate) fn after_hooks<'a>(&'a self, action: &'a str) -> impl Iterator<Item = HookFn<C>> + 'a {
        self.after_actions
            .iter()
            .filter(move |h| h.applies_to(action))
            .map(|h| h.handler)
    }
}

impl<C> std::fmt::Debug for ActionTable<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionTable")
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("before_actions", &self.before_actions.len())
            .field("after_actions", &self.after_actions.len())
            .finish()
    }
}

//! The base controller contract.

use std::any::type_name;
use std::cell::Ref;
use std::sync::Arc;

use serde_json::Value;

use super::action::{ActionArgs, ActionOutcome, ActionTable};
use super::dispatcher::Dispatcher;
use super::naming::controller_name_from_type;
use crate::component::Component;
use crate::error::ControllerError;
use crate::http::{ClientResponse, ServerRequest};
use crate::model::Model;
use crate::view::{View, ViewData};

/// A controller: a type owning a [`Dispatcher`] and declaring its actions.
///
/// Every method besides [`dispatcher`](Controller::dispatcher),
/// [`dispatcher_mut`](Controller::dispatcher_mut) and
/// [`actions`](Controller::actions) is provided. None of them can be invoked
/// as an action.
pub trait Controller: Sized + 'static {
    fn dispatcher(&self) -> &Dispatcher;

    fn dispatcher_mut(&mut self) -> &mut Dispatcher;

    /// Declare the invokable actions and hooks of this controller type.
    fn actions(table: &mut ActionTable<Self>);

    /// The controller name, "Posts" for `PostsController`.
    fn controller_name() -> String {
        controller_name_from_type(type_name::<Self>())
    }

    /// Invoke an action by name with positional arguments.
    ///
    /// Unknown names, unregistered helpers and base controller methods fail
    /// with [`ControllerError::ActionNotInvokable`] before anything runs.
    fn invoke_action(&mut self, action: &str, args: Vec<Value>) -> Result<&mut Self, ControllerError> {
        let table = self.dispatcher().app().controllers().table::<Self>();
        let handler = match table.lookup(action) {
            Some(handler) => handler,
            None => {
                log::debug!(
                    "Refusing to invoke '{}' on {}",
                    action,
                    self.dispatcher().name()
                );
                return Err(ControllerError::action_not_invokable(action));
            }
        };

        for hook in table.before_hooks(action) {
            if let ActionOutcome::Respond(response) = hook(self, action)? {
                self.dispatcher_mut().replace_response(response);
                return Ok(self);
            }
        }

        match handler(self, ActionArgs::new(action, &args))? {
            ActionOutcome::Respond(response) => self.dispatcher_mut().replace_response(response),
            ActionOutcome::Continue => self.dispatcher_mut().render_after_action(action)?,
        }

        for hook in table.after_hooks(action) {
            if let ActionOutcome::Respond(response) = hook(self, action)? {
                self.dispatcher_mut().replace_response(response);
            }
        }

        Ok(self)
    }

    fn name(&self) -> String {
        self.dispatcher().name()
    }

    fn request(&self) -> Ref<'_, ServerRequest> {
        self.dispatcher().request()
    }

    fn response(&self) -> Ref<'_, ClientResponse> {
        self.dispatcher().response()
    }

    /// The response as it stands, consuming the controller.
    fn into_response(self) -> ClientResponse {
        let response = self.dispatcher().response().clone();
        response
    }

    fn view(&self) -> &Arc<dyn View> {
        self.dispatcher().view()
    }

    fn data(&self) -> Ref<'_, ViewData> {
        self.dispatcher().data()
    }

    fn set(&mut self, key: &str, value: Value) -> &mut Self {
        self.dispatcher_mut().set(key, value);
        self
    }

    fn set_data(&mut self, data: ViewData) -> &mut Self {
        self.dispatcher_mut().set_data(data);
        self
    }

    fn template(&self) -> Option<String> {
        self.dispatcher().template()
    }

    fn set_template(&mut self, template: &str) -> &mut Self {
        self.dispatcher_mut().set_template(template);
        self
    }

    fn enable_auto_render(&mut self, enabled: bool) -> &mut Self {
        self.dispatcher_mut().enable_auto_render(enabled);
        self
    }

    fn render(&mut self, template: &str) -> Result<&mut Self, ControllerError> {
        self.dispatcher_mut().render(template)?;
        Ok(self)
    }

    fn load_component(&mut self, name: &str, options: Value) -> Result<&mut Self, ControllerError> {
        self.dispatcher_mut().load_component(name, options)?;
        Ok(self)
    }

    fn component(&self, name: &str) -> Result<&dyn Component, ControllerError> {
        self.dispatcher().component(name)
    }

    fn component_as<T: Component>(&self, name: &str) -> Result<&T, ControllerError> {
        self.dispatcher().component_as(name)
    }

    fn component_as_mut<T: Component>(&mut self, name: &str) -> Result<&mut T, ControllerError> {
        self.dispatcher_mut().component_as_mut(name)
    }

    fn fetch_model(&self, alias: Option<&str>) -> Result<Arc<dyn Model>, ControllerError> {
        self.dispatcher().fetch_model(alias)
    }
}

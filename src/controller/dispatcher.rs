//! Per-request controller state.
//!
//! A [`Dispatcher`] is created once per inbound request and owns the request,
//! the response under construction, the view data, the template selection and
//! the attached components. Components reach back into it through a
//! [`ControllerHandle`], which never keeps the controller alive.

use std::cell::{OnceCell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use super::controller::Controller;
use super::naming::{default_template, humanize};
use crate::app::AppContext;
use crate::component::Component;
use crate::error::ControllerError;
use crate::http::{ClientResponse, ServerRequest};
use crate::model::Model;
use crate::view::{View, ViewData};

/// The shared, mutable part of a controller.
#[derive(Debug)]
pub struct DispatchState {
    name: OnceCell<String>,
    name_source: fn() -> String,
    request: ServerRequest,
    response: ClientResponse,
    view_data: ViewData,
    template: Option<String>,
    auto_render: bool,
}

impl DispatchState {
    /// The controller name, derived once from the controller type.
    pub fn name(&self) -> &str {
        self.name.get_or_init(self.name_source)
    }

    pub fn request(&self) -> &ServerRequest {
        &self.request
    }

    pub fn response(&self) -> &ClientResponse {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut ClientResponse {
        &mut self.response
    }

    pub fn data(&self) -> &ViewData {
        &self.view_data
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.view_data.insert(key.into(), value.into());
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn auto_render(&self) -> bool {
        self.auto_render
    }
}

/// A weak back-reference from a component to its controller.
///
/// Every accessor returns `None` once the controller is gone, or while the
/// controller state is being mutated.
#[derive(Debug, Clone, Default)]
pub struct ControllerHandle {
    state: Weak<RefCell<DispatchState>>,
}

impl ControllerHandle {
    /// A handle bound to no controller.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn is_alive(&self) -> bool {
        self.state.strong_count() > 0
    }

    pub fn with<R>(&self, f: impl FnOnce(&DispatchState) -> R) -> Option<R> {
        let state = self.state.upgrade()?;
        let guard = state.try_borrow().ok()?;
        Some(f(&guard))
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut DispatchState) -> R) -> Option<R> {
        let state = self.state.upgrade()?;
        let mut guard = state.try_borrow_mut().ok()?;
        Some(f(&mut guard))
    }

    pub fn name(&self) -> Option<String> {
        self.with(|s| s.name().to_string())
    }

    pub fn request(&self) -> Option<ServerRequest> {
        self.with(|s| s.request.clone())
    }

    /// Set a view data value on the controller. Returns whether it was set.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        self.with_mut(|s| s.set(key, value)).is_some()
    }
}

/// The dispatch core behind every [`Controller`].
pub struct Dispatcher {
    state: Rc<RefCell<DispatchState>>,
    components: IndexMap<String, Box<dyn Component>>,
    app: AppContext,
}

impl Dispatcher {
    /// Create the dispatch state for a controller of type `C`.
    ///
    /// Sets the `title` view data value to the humanized controller name.
    pub fn new<C: Controller>(
        app: &AppContext,
        request: ServerRequest,
        response: ClientResponse,
    ) -> Self {
        let mut state = DispatchState {
            name: OnceCell::new(),
            name_source: C::controller_name,
            request,
            response,
            view_data: ViewData::new(),
            template: None,
            auto_render: app.auto_render(),
        };
        let title = humanize(state.name());
        state.set("title", title);

        Self {
            state: Rc::new(RefCell::new(state)),
            components: IndexMap::new(),
            app: app.clone(),
        }
    }

    /// A weak handle to this controller, for components.
    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            state: Rc::downgrade(&self.state),
        }
    }

    pub fn app(&self) -> &AppContext {
        &self.app
    }

    pub fn view(&self) -> &Arc<dyn View> {
        self.app.view()
    }

    pub fn name(&self) -> String {
        self.state.borrow().name().to_string()
    }

    pub fn request(&self) -> Ref<'_, ServerRequest> {
        Ref::map(self.state.borrow(), |s| &s.request)
    }

    pub fn response(&self) -> Ref<'_, ClientResponse> {
        Ref::map(self.state.borrow(), |s| &s.response)
    }

    /// Mutable access to the response, e.g. to set headers from an action.
    pub fn response_mut(&mut self) -> RefMut<'_, ClientResponse> {
        RefMut::map(self.state.borrow_mut(), |s| &mut s.response)
    }

    /// Replace the response wholesale.
    pub fn replace_response(&mut self, response: ClientResponse) {
        self.state.borrow_mut().response = response;
    }

    /// Hand the response back, consuming the controller state.
    pub fn into_response(self) -> ClientResponse {
        let Self {
            state, components, ..
        } = self;
        // Components only hold weak handles; drop them first all the same.
        drop(components);
        match Rc::try_unwrap(state) {
            Ok(cell) => cell.into_inner().response,
            Err(shared) => shared.borrow().response.clone(),
        }
    }

    pub fn data(&self) -> Ref<'_, ViewData> {
        Ref::map(self.state.borrow(), |s| &s.view_data)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.state.borrow_mut().set(key, value);
    }

    pub fn set_data(&mut self, data: impl IntoIterator<Item = (String, Value)>) {
        self.state.borrow_mut().view_data.extend(data);
    }

    pub fn template(&self) -> Option<String> {
        self.state.borrow().template.clone()
    }

    pub fn set_template(&mut self, template: impl Into<String>) {
        self.state.borrow_mut().template = Some(template.into());
    }

    pub fn auto_render(&self) -> bool {
        self.state.borrow().auto_render
    }

    pub fn enable_auto_render(&mut self, enabled: bool) {
        self.state.borrow_mut().auto_render = enabled;
    }

    /// Render a template with the view data and append it to the body.
    pub fn render(&mut self, template: &str) -> Result<(), ControllerError> {
        let output = {
            let state = self.state.borrow();
            self.app.view().render(template, &state.view_data)?
        };
        self.state.borrow_mut().response.append_body(&output);
        Ok(())
    }

    /// Render after an action if auto rendering is on and the body is empty.
    ///
    /// Without an explicit template, `{name}/{action}` is used and kept as
    /// the template.
    pub(crate) fn render_after_action(&mut self, action: &str) -> Result<(), ControllerError> {
        let template = {
            let mut state = self.state.borrow_mut();
            if !state.auto_render || !state.response.body().is_empty() {
                return Ok(());
            }
            let name = state.name().to_string();
            state
                .template
                .get_or_insert_with(|| default_template(&name, action))
                .clone()
        };
        log::trace!("Auto rendering {} for action {}", template, action);
        self.render(&template)
    }

    /// Attach a component by name. Loading a name twice is a no-op.
    pub fn load_component(&mut self, name: &str, options: Value) -> Result<(), ControllerError> {
        if self.components.contains_key(name) {
            log::debug!("Component {} already loaded", name);
            return Ok(());
        }
        let component = self.app.components().load(name, self.handle(), &options)?;
        self.components.insert(name.to_string(), component);
        Ok(())
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Names of the attached components, in load order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn component(&self, name: &str) -> Result<&dyn Component, ControllerError> {
        self.components
            .get(name)
            .map(|c| c.as_ref())
            .ok_or_else(|| ControllerError::component_not_loaded(name))
    }

    pub fn component_as<T: Component>(&self, name: &str) -> Result<&T, ControllerError> {
        self.component(name)?
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| ControllerError::component_type_mismatch(name, std::any::type_name::<T>()))
    }

    pub fn component_as_mut<T: Component>(&mut self, name: &str) -> Result<&mut T, ControllerError> {
        self.components
            .get_mut(name)
            .ok_or_else(|| ControllerError::component_not_loaded(name))?
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or_else(|| ControllerError::component_type_mismatch(name, std::any::type_name::<T>()))
    }

    /// Fetch a model, defaulting the alias to the controller name.
    pub fn fetch_model(&self, alias: Option<&str>) -> Result<Arc<dyn Model>, ControllerError> {
        let alias = match alias {
            Some(alias) => alias.to_string(),
            None => self.name(),
        };
        Ok(self.app.models().resolve(&alias)?)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("state", &self.state)
            .field("components", &self.components.keys().collect::<Vec<_>>())
            .finish()
    }
}

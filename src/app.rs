//! Application context shared by every request.

use std::sync::Arc;

use crate::component::ComponentRegistry;
use crate::config::AppConfig;
use crate::controller::ControllerRegistry;
use crate::model::{ModelRegistry, ModelTable};
use crate::view::{FileView, View};

/// The process-wide collaborators a [`Dispatcher`](crate::controller::Dispatcher)
/// is built from. Cloning is cheap; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppContext {
    components: Arc<ComponentRegistry>,
    controllers: Arc<ControllerRegistry>,
    view: Arc<dyn View>,
    models: Arc<dyn ModelRegistry>,
    auto_render: bool,
}

impl AppContext {
    /// A context rendering through `view`, with empty registries.
    pub fn new(view: Arc<dyn View>) -> Self {
        Self {
            components: Arc::new(ComponentRegistry::new()),
            controllers: Arc::new(ControllerRegistry::new()),
            view,
            models: Arc::new(ModelTable::new()),
            auto_render: true,
        }
    }

    /// Build a context from configuration: a [`FileView`] over the configured
    /// view paths and a component registry seeded with the namespaces.
    pub fn from_config(config: &AppConfig) -> Self {
        let view = FileView::with_extensions(config.template_extensions.clone());
        for path in &config.views {
            view.add_path(path.clone());
        }

        let components = ComponentRegistry::new();
        for namespace in &config.component_namespaces {
            components.add_namespace(namespace);
        }

        Self::new(Arc::new(view))
            .with_components(Arc::new(components))
            .with_auto_render(config.auto_render)
    }

    pub fn with_components(mut self, components: Arc<ComponentRegistry>) -> Self {
        self.components = components;
        self
    }

    pub fn with_controllers(mut self, controllers: Arc<ControllerRegistry>) -> Self {
        self.controllers = controllers;
        self
    }

    pub fn with_models(mut self, models: Arc<dyn ModelRegistry>) -> Self {
        self.models = models;
        self
    }

    pub fn with_view(mut self, view: Arc<dyn View>) -> Self {
        self.view = view;
        self
    }

    /// Default auto render flag for new controllers.
    pub fn with_auto_render(mut self, enabled: bool) -> Self {
        self.auto_render = enabled;
        self
    }

    pub fn components(&self) -> &Arc<ComponentRegistry> {
        &self.components
    }

    pub fn controllers(&self) -> &Arc<ControllerRegistry> {
        &self.controllers
    }

    pub fn view(&self) -> &Arc<dyn View> {
        &self.view
    }

    pub fn models(&self) -> &Arc<dyn ModelRegistry> {
        &self.models
    }

    pub fn auto_render(&self) -> bool {
        self.auto_render
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("components", &self.components)
            .field("controllers", &self.controllers)
            .field("auto_render", &self.auto_render)
            .finish()
    }
}

//! Application configuration.
//!
//! Read from the environment (`SOLI_*` variables) or from a YAML file. Every
//! field has a default, so an empty document is a valid configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::view::file::DEFAULT_EXTENSIONS;

pub const VIEWS_PATH_VAR: &str = "SOLI_VIEWS_PATH";
pub const COMPONENT_NAMESPACES_VAR: &str = "SOLI_COMPONENT_NAMESPACES";
pub const AUTO_RENDER_VAR: &str = "SOLI_AUTO_RENDER";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// View search paths, in priority order.
    pub views: Vec<PathBuf>,
    /// Extensions tried when resolving a template name.
    pub template_extensions: Vec<String>,
    /// Component namespaces, in priority order.
    pub component_namespaces: Vec<String>,
    /// Render `{name}/{action}` after actions that produced no output.
    pub auto_render: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            views: vec![PathBuf::from("app/views")],
            template_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            component_namespaces: Vec::new(),
            auto_render: true,
        }
    }
}

impl AppConfig {
    /// Load from `SOLI_VIEWS_PATH`, `SOLI_COMPONENT_NAMESPACES` and
    /// `SOLI_AUTO_RENDER`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(paths) = var(VIEWS_PATH_VAR) {
            config.views = std::env::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }

        if let Some(namespaces) = var(COMPONENT_NAMESPACES_VAR) {
            config.component_namespaces = namespaces
                .split(',')
                .map(str::trim)
                .filter(|ns| !ns.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(flag) = var(AUTO_RENDER_VAR) {
            config.auto_render = parse_flag(AUTO_RENDER_VAR, &flag)?;
        }

        Ok(config)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        // An empty YAML document deserializes as null, not as an empty map.
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&source)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

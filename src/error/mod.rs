//! Error types for dispatch, views, models and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// View rendering errors.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unterminated tag in template {template} at byte {offset}")]
    UnterminatedTag { template: String, offset: usize },

    #[error("{0}")]
    General(String),
}

impl ViewError {
    pub fn template_not_found(template: impl Into<String>) -> Self {
        Self::TemplateNotFound(template.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self::General(message.into())
    }
}

/// Model registry errors.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    General(String),
}

impl ModelError {
    pub fn not_found(alias: impl Into<String>) -> Self {
        Self::NotFound(alias.into())
    }
}

/// Errors raised by the dispatch core.
///
/// The component and action variants are programmer or configuration errors:
/// they are deterministic for a given input and are never retried. View and
/// model failures pass through untouched.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("Component not loaded: {0}")]
    ComponentNotLoaded(String),

    #[error("Component '{name}' is not a {expected}")]
    ComponentTypeMismatch { name: String, expected: &'static str },

    #[error("Invalid method invocation: {0}")]
    ActionNotInvokable(String),

    #[error("Missing argument {index} for action '{action}'")]
    MissingArgument { action: String, index: usize },

    #[error("Invalid argument {index} for action '{action}': expected {expected}")]
    InvalidArgument {
        action: String,
        index: usize,
        expected: &'static str,
    },

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ControllerError {
    pub fn component_not_found(name: impl Into<String>) -> Self {
        Self::ComponentNotFound(name.into())
    }

    pub fn component_not_loaded(name: impl Into<String>) -> Self {
        Self::ComponentNotLoaded(name.into())
    }

    pub fn component_type_mismatch(name: impl Into<String>, expected: &'static str) -> Self {
        Self::ComponentTypeMismatch {
            name: name.into(),
            expected,
        }
    }

    pub fn action_not_invokable(action: impl Into<String>) -> Self {
        Self::ActionNotInvokable(action.into())
    }

    pub fn missing_argument(action: impl Into<String>, index: usize) -> Self {
        Self::MissingArgument {
            action: action.into(),
            index,
        }
    }

    pub fn invalid_argument(action: impl Into<String>, index: usize, expected: &'static str) -> Self {
        Self::InvalidArgument {
            action: action.into(),
            index,
            expected,
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_the_offending_name() {
        assert_eq!(
            ControllerError::component_not_found("Auth").to_string(),
            "Component not found: Auth"
        );
        assert_eq!(
            ControllerError::component_not_loaded("Auth").to_string(),
            "Component not loaded: Auth"
        );
        assert_eq!(
            ControllerError::action_not_invokable("render").to_string(),
            "Invalid method invocation: render"
        );
    }

    #[test]
    fn test_view_errors_pass_through_unchanged() {
        let err: ControllerError = ViewError::template_not_found("posts/index").into();
        assert_eq!(err.to_string(), "Template not found: posts/index");
        assert!(matches!(
            err,
            ControllerError::View(ViewError::TemplateNotFound(ref t)) if t == "posts/index"
        ));
    }
}

//! # Modula Core Component Errors
use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("Component '{component}' has a managed dependency on '{dependency}', which is not available")]
    MissingDependency { component: String, dependency: String },

    /// The cycle path, first node repeated at the end
    #[error("Circular dependency detected: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),

    #[error("Component '{0}' is listed more than once")]
    DuplicateComponent(String),

    #[error("Component not registered: {0}")]
    NotRegistered(String),

    #[error("Component '{0}' is running and cannot be replaced")]
    AlreadyRunning(String),

    #[error("Component id '{0}' is reserved")]
    ReservedId(String),

    #[error("Activation of component '{component}' failed: {message}")]
    Activation {
        component: String,
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    #[error("Deactivation of component '{component}' failed: {message}")]
    Deactivation {
        component: String,
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    #[error("Shutdown incomplete, {} component(s) failed to stop: {}", .0.len(), .0.join("; "))]
    ShutdownIncomplete(Vec<String>),
}

impl ComponentError {
    pub(crate) fn activation(
        component: impl Into<String>,
        message: impl Into<String>,
        source: Option<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        ComponentError::Activation {
            component: component.into(),
            message: message.into(),
            source,
        }
    }

    pub(crate) fn deactivation(
        component: impl Into<String>,
        message: impl Into<String>,
        source: Option<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        ComponentError::Deactivation {
            component: component.into(),
            message: message.into(),
            source,
        }
    }
}

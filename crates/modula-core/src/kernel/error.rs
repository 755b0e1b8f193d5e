//! # Modula Core Kernel Errors
//!
//! [`Error`] rolls every subsystem error up into one type so that bootstrap
//! code and embedders can use a single `Result`.
use std::error::Error as StdError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::artifact::ArtifactError;
use crate::component::ComponentError;
use crate::export::ExportError;
use crate::loading::LoadingError;
use crate::specification::SpecificationError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Descriptor could not be read or violates the schema
    #[error("Specification error: {0}")]
    Specification(#[from] SpecificationError),

    /// Ordering, activation or deactivation failure
    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Loading error: {0}")]
    Loading(#[from] LoadingError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Runtime configuration could not be loaded or is invalid
    #[error("Configuration error{}: {message}", .path.as_ref().map(|p| format!(" in '{}'", p.display())).unwrap_or_default())]
    Config {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    #[error("I/O error during operation '{operation}' on path '{}': {source}", .path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
        operation: String,
    },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// I/O error with the operation and path that caused it
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        Error::Io {
            source,
            operation: operation.into(),
            path,
        }
    }

    pub(crate) fn config(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Error::Config {
            path,
            message: message.into(),
            source: None,
        }
    }
}

//! # Modula Core Specification Errors
//!
//! [`SpecificationError`] covers reading descriptor resources, schema
//! violations in their content and clashes between descriptors loaded together.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecificationError {
    #[error("Invalid component descriptor '{resource}': {violation}")]
    Parse { resource: String, violation: String },

    #[error("Failed to read component descriptor '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported descriptor format for '{}'", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Component '{id}' is declared by both '{first}' and '{second}'")]
    DuplicateComponent {
        id: String,
        first: String,
        second: String,
    },
}

impl SpecificationError {
    pub(crate) fn parse(resource: impl Into<String>, violation: impl Into<String>) -> Self {
        SpecificationError::Parse {
            resource: resource.into(),
            violation: violation.into(),
        }
    }
}

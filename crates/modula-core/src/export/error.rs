//! # Modula Core Export Registry Errors
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Invalid export prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },
}

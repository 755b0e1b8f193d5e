//! # Modula Core Loading Errors
//!
//! [`LoadingError`] is raised while building loading contexts or resolving
//! symbols through them.
use std::path::PathBuf;
use thiserror::Error;

use crate::artifact::ArtifactError;

#[derive(Debug, Error)]
pub enum LoadingError {
    #[error("Symbol '{name}' not found in context '{context}'{}", .exporter.as_ref().map(|e| format!(" (namespace exported by '{}')", e)).unwrap_or_default())]
    SymbolNotFound {
        name: String,
        context: String,
        /// The context that owns the namespace, when the export tier answered
        exporter: Option<String>,
    },

    #[error("Archive at '{}' cannot be read: {reason}", .location.display())]
    ArchiveUnreadable {
        location: PathBuf,
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Classpath resolution failed: {0}")]
    Artifact(#[from] ArtifactError),
}

impl LoadingError {
    pub(crate) fn unreadable(location: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LoadingError::ArchiveUnreadable {
            location: location.into(),
            reason: reason.into(),
            source: None,
        }
    }
}

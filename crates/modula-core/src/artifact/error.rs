//! # Modula Core Artifact Errors
//!
//! Defines [`ArtifactError`], raised while parsing coordinates or resolving them
//! against the local artifact cache.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found for '{coordinate}' at path: {}", .path.display())]
    NotFound { coordinate: String, path: PathBuf },

    #[error("Invalid coordinate '{input}': {reason}")]
    InvalidCoordinate { input: String, reason: String },

    #[error("Version conflict for '{group}:{artifact}': classpath already holds '{existing}', requested '{requested}'")]
    VersionConflict {
        group: String,
        artifact: String,
        existing: String,
        requested: String,
    },
}

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::artifact::classpath::{Classpath, ClasspathElement};
use crate::artifact::coordinate::{versions_compatible, Coordinate};
use crate::artifact::error::ArtifactError;

/// Maps coordinates to local archives
pub trait CoordinateResolver: Send + Sync + Debug {
    /// Resolve `coordinate` for a classpath that already holds `existing`.
    ///
    /// Returns `Ok(None)` when `existing` already carries a compatible version of
    /// the same group/artifact, so callers never add a duplicate definition.
    fn resolve(
        &self,
        existing: &Classpath,
        coordinate: &Coordinate,
    ) -> Result<Option<ClasspathElement>, ArtifactError>;
}

/// Resolver backed by a conventional local artifact cache:
/// `<root>/<group as path>/<artifact>/<version>/<artifact>-<version>`.
#[derive(Debug, Clone)]
pub struct LocalRepositoryResolver {
    root: PathBuf,
}

impl LocalRepositoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic cache location of `coordinate`, whether or not it exists
    pub fn artifact_path(&self, coordinate: &Coordinate) -> PathBuf {
        let mut path = self.root.clone();
        for segment in coordinate.group.split('.') {
            path.push(segment);
        }
        path.push(&coordinate.artifact);
        path.push(&coordinate.version);
        path.push(format!("{}-{}", coordinate.artifact, coordinate.version));
        path
    }
}

impl CoordinateResolver for LocalRepositoryResolver {
    fn resolve(
        &self,
        existing: &Classpath,
        coordinate: &Coordinate,
    ) -> Result<Option<ClasspathElement>, ArtifactError> {
        if let Some(present) = existing.find_artifact(&coordinate.group, &coordinate.artifact) {
            if versions_compatible(&present.version, &coordinate.version) {
                log::debug!(
                    "Coordinate {} already satisfied by {}, not adding a duplicate",
                    coordinate,
                    present
                );
                return Ok(None);
            }
            return Err(ArtifactError::VersionConflict {
                group: coordinate.group.clone(),
                artifact: coordinate.artifact.clone(),
                existing: present.version.clone(),
                requested: coordinate.version.clone(),
            });
        }

        let path = self.artifact_path(coordinate);
        if !path.is_dir() {
            return Err(ArtifactError::NotFound {
                coordinate: coordinate.to_string(),
                path,
            });
        }
        log::debug!("Resolved {} to {}", coordinate, path.display());
        Ok(Some(ClasspathElement::resolved(path, coordinate.clone())))
    }
}

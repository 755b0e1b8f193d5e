use std::fmt;
use std::str::FromStr;

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

use crate::artifact::error::ArtifactError;

/// Visibility of a resolved library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Added to the shared loading context, visible to every component
    Share,
    /// Confined to the component that requested it
    #[default]
    Private,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Share => "share",
            Scope::Private => "private",
        }
    }
}

impl FromStr for Scope {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "share" | "shared" => Ok(Scope::Share),
            "private" => Ok(Scope::Private),
            _ => Err(ArtifactError::InvalidCoordinate {
                input: s.to_string(),
                reason: "scope must be 'share' or 'private'".to_string(),
            }),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured reference to an external library artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub scope: Scope,
}

impl Coordinate {
    /// Create a private-scoped coordinate
    pub fn new(group: &str, artifact: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
            version: version.to_string(),
            scope: Scope::Private,
        }
    }

    /// Same coordinate with a different scope
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Parses `group:artifact:version`
    pub fn parse(input: &str) -> Result<Self, ArtifactError> {
        let invalid = |reason: &str| ArtifactError::InvalidCoordinate {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = input.trim().split(':').collect();
        if parts.len() != 3 {
            return Err(invalid("expected 'group:artifact:version'"));
        }
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid("group, artifact and version must be non-empty"));
        }
        if parts[0].split('.').any(str::is_empty) {
            return Err(invalid("group contains an empty segment"));
        }
        if parts
            .iter()
            .any(|p| p.contains('/') || p.contains('\\') || p.contains("..") || p.contains(char::is_whitespace))
        {
            return Err(invalid("parts must not contain path separators, '..' or whitespace"));
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }

    /// Whether `other` names the same library, ignoring version and scope
    pub fn same_artifact(&self, other: &Coordinate) -> bool {
        self.group == other.group && self.artifact == other.artifact
    }

    /// `group:artifact` key
    pub fn artifact_key(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }
}

impl FromStr for Coordinate {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Coordinate::parse(s)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// Whether a classpath already holding `existing` satisfies a request for `requested`.
///
/// Semver versions follow caret rules: `existing` must be at least `requested`
/// with the same major, the same minor for `0.x` and the same patch for
/// `0.0.x`. Anything that does not parse as semver must match exactly.
pub fn versions_compatible(existing: &str, requested: &str) -> bool {
    match (Version::parse(existing), VersionReq::parse(&format!("^{}", requested))) {
        (Ok(existing), Ok(requirement)) if Version::parse(requested).is_ok() => requirement.matches(&existing),
        _ => existing == requested,
    }
}

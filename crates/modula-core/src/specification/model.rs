use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::artifact::Coordinate;

/// Identity of a component specification
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpecId(String);

impl SpecId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpecId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SpecId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for SpecId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One classpath entry of a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClasspathEntry {
    /// An archive given directly by location
    Location(PathBuf),
    /// A library that must be resolved through the coordinate resolver
    Coordinate(Coordinate),
}

/// A dependency edge to another component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDependency {
    /// The component depended upon
    pub target: SpecId,
    /// Whether the manager starts/stops `target` as part of the dependent's lifecycle
    pub managed: bool,
}

impl ComponentDependency {
    /// Dependency whose lifecycle the manager drives
    pub fn managed(target: impl Into<SpecId>) -> Self {
        Self {
            target: target.into(),
            managed: true,
        }
    }

    /// Dependency that is assumed to be running already
    pub fn unmanaged(target: impl Into<SpecId>) -> Self {
        Self {
            target: target.into(),
            managed: false,
        }
    }
}

impl fmt::Display for ComponentDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.managed { "Managed" } else { "Unmanaged" };
        write!(f, "{} dependency: {}", kind, self.target)
    }
}

/// Declarative description of a component. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpecification {
    id: SpecId,
    resource: Option<PathBuf>,
    activator: String,
    classpath: Vec<ClasspathEntry>,
    dependencies: Vec<ComponentDependency>,
    exports: Vec<String>,
    managed: bool,
}

impl ComponentSpecification {
    pub fn id(&self) -> &SpecId {
        &self.id
    }

    /// The descriptor this specification was parsed from, if any
    pub fn resource(&self) -> Option<&Path> {
        self.resource.as_deref()
    }

    /// Directory relative classpath locations are resolved against
    pub fn base_dir(&self) -> Option<&Path> {
        self.resource.as_deref().and_then(Path::parent)
    }

    /// Fully-qualified type name of the activator
    pub fn activator(&self) -> &str {
        &self.activator
    }

    pub fn classpath(&self) -> &[ClasspathEntry] {
        &self.classpath
    }

    pub fn dependencies(&self) -> &[ComponentDependency] {
        &self.dependencies
    }

    /// Dependencies the manager must start before this component
    pub fn managed_dependencies(&self) -> impl Iterator<Item = &ComponentDependency> {
        self.dependencies.iter().filter(|d| d.managed)
    }

    /// Namespace prefixes this component is authoritative for while running
    pub fn exports(&self) -> &[String] {
        &self.exports
    }

    /// Whether this component's lifecycle is driven by its dependents rather than
    /// started on its own
    pub fn is_managed(&self) -> bool {
        self.managed
    }

    /// Resolve a classpath location against the descriptor's directory
    pub fn resolve_location(&self, location: &Path) -> PathBuf {
        match self.base_dir() {
            Some(base) if location.is_relative() => base.join(location),
            _ => location.to_path_buf(),
        }
    }
}

/// Builder for creating a component specification
pub struct SpecificationBuilder {
    spec: ComponentSpecification,
}

impl SpecificationBuilder {
    /// Create a new builder for component `id` started by `activator`
    pub fn new(id: impl Into<SpecId>, activator: &str) -> Self {
        Self {
            spec: ComponentSpecification {
                id: id.into(),
                resource: None,
                activator: activator.to_string(),
                classpath: Vec::new(),
                dependencies: Vec::new(),
                exports: Vec::new(),
                managed: false,
            },
        }
    }

    /// Record the descriptor resource
    pub fn resource(mut self, resource: impl Into<PathBuf>) -> Self {
        self.spec.resource = Some(resource.into());
        self
    }

    /// Add an archive location to the classpath
    pub fn location(mut self, location: impl Into<PathBuf>) -> Self {
        self.spec.classpath.push(ClasspathEntry::Location(location.into()));
        self
    }

    /// Add a coordinate to the classpath
    pub fn coordinate(mut self, coordinate: Coordinate) -> Self {
        self.spec.classpath.push(ClasspathEntry::Coordinate(coordinate));
        self
    }

    /// Add a dependency
    pub fn dependency(mut self, target: impl Into<SpecId>, managed: bool) -> Self {
        self.spec.dependencies.push(ComponentDependency {
            target: target.into(),
            managed,
        });
        self
    }

    /// Export a namespace prefix
    pub fn export(mut self, prefix: &str) -> Self {
        self.spec.exports.push(prefix.to_string());
        self
    }

    /// Set whether the component's lifecycle is driven by its dependents
    pub fn managed(mut self, managed: bool) -> Self {
        self.spec.managed = managed;
        self
    }

    /// Build the specification
    pub fn build(self) -> ComponentSpecification {
        self.spec
    }
}

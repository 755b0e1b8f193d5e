use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::artifact::{Coordinate, Scope};
use crate::export::registry::validate_prefix;
use crate::kernel::constants;
use crate::loading::symbol::ContextId;
use crate::specification::error::SpecificationError;
use crate::specification::model::{ComponentSpecification, SpecId, SpecificationBuilder};
use crate::utils::fs::find_files;

/// Supported descriptor formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl DescriptorFormat {
    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(DescriptorFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(DescriptorFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(DescriptorFormat::Toml),
                _ => None,
            })
    }
}

// --- Intermediate structs for deserialization ---

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawDescriptor {
    #[serde(default)]
    id: Option<String>,
    activator: String,
    #[serde(default)]
    managed: bool,
    #[serde(default)]
    classpath: Vec<RawClasspathEntry>,
    #[serde(default)]
    dependencies: Vec<RawDependency>,
    #[serde(default)]
    exports: Vec<String>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawClasspathEntry {
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    coordinate: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawDependency {
    component: String,
    #[serde(default = "default_managed")]
    managed: bool,
}

fn default_managed() -> bool {
    true
}

// --- End Intermediate structs ---

/// Parses and validates component descriptors
pub struct SpecificationParser;

impl SpecificationParser {
    /// Parse descriptor `content` read from `resource`.
    ///
    /// `resource` names the descriptor in error messages and provides the
    /// default component id when the descriptor does not declare one.
    pub fn parse_str(
        resource: &str,
        content: &str,
        format: DescriptorFormat,
    ) -> Result<ComponentSpecification, SpecificationError> {
        let raw = Self::deserialize(resource, content, format)?;
        Self::validate(resource, raw).map(SpecificationBuilder::build)
    }

    /// Read and parse a descriptor file
    pub fn parse_file(path: &Path) -> Result<ComponentSpecification, SpecificationError> {
        let format = DescriptorFormat::from_path(path)
            .ok_or_else(|| SpecificationError::UnsupportedFormat { path: path.to_path_buf() })?;
        let content = fs::read_to_string(path).map_err(|source| SpecificationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let resource = path.display().to_string();
        let raw = Self::deserialize(&resource, &content, format)?;
        let spec = Self::validate(&resource, raw)?.resource(path).build();
        log::debug!("Parsed component descriptor {} as '{}'", resource, spec.id());
        Ok(spec)
    }

    /// Load every descriptor below `dir`, which must exist.
    ///
    /// Descriptors are files named `component.<ext>` or `<id>.component.<ext>`.
    /// Results are ordered by path; two descriptors declaring the same id fail.
    pub fn load_directory(dir: &Path) -> Result<Vec<ComponentSpecification>, SpecificationError> {
        if !dir.is_dir() {
            return Err(SpecificationError::Read {
                path: dir.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "descriptor directory does not exist"),
            });
        }
        let mut paths = find_files(dir, &is_descriptor_file).map_err(|source| SpecificationError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        paths.sort();

        let mut seen: HashMap<SpecId, PathBuf> = HashMap::new();
        let mut specs = Vec::with_capacity(paths.len());
        for path in paths {
            let spec = Self::parse_file(&path)?;
            if let Some(first) = seen.get(spec.id()) {
                return Err(SpecificationError::DuplicateComponent {
                    id: spec.id().to_string(),
                    first: first.display().to_string(),
                    second: path.display().to_string(),
                });
            }
            seen.insert(spec.id().clone(), path);
            specs.push(spec);
        }
        log::info!("Loaded {} component descriptor(s) from {}", specs.len(), dir.display());
        Ok(specs)
    }

    fn deserialize(
        resource: &str,
        content: &str,
        format: DescriptorFormat,
    ) -> Result<RawDescriptor, SpecificationError> {
        match format {
            DescriptorFormat::Json => serde_json::from_str(content)
                .map_err(|e| SpecificationError::parse(resource, e.to_string())),
            #[cfg(feature = "yaml-config")]
            DescriptorFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| SpecificationError::parse(resource, e.to_string())),
            #[cfg(feature = "toml-config")]
            DescriptorFormat::Toml => toml::from_str(content)
                .map_err(|e| SpecificationError::parse(resource, e.to_string())),
        }
    }

    /// Schema checks; everything that serde cannot express
    fn validate(resource: &str, raw: RawDescriptor) -> Result<SpecificationBuilder, SpecificationError> {
        let violation = |message: String| SpecificationError::parse(resource, message);

        let id = match raw.id {
            Some(id) => id,
            None => default_id(Path::new(resource))
                .ok_or_else(|| violation("no 'id' declared and none can be derived from the resource name".to_string()))?,
        };
        if !is_valid_id(&id) {
            return Err(violation(format!(
                "component id '{}' must be non-empty and use only [A-Za-z0-9._-]",
                id
            )));
        }
        if id == ContextId::SHARED {
            return Err(violation(format!(
                "component id '{}' is reserved for the shared loading context",
                id
            )));
        }

        if !is_dotted_identifier(&raw.activator) {
            return Err(violation(format!(
                "activator '{}' is not a fully-qualified type name",
                raw.activator
            )));
        }

        let mut builder = SpecificationBuilder::new(id.as_str(), &raw.activator).managed(raw.managed);

        for (index, entry) in raw.classpath.into_iter().enumerate() {
            builder = match (entry.location, entry.coordinate) {
                (Some(location), None) => {
                    if entry.scope.is_some() {
                        return Err(violation(format!(
                            "classpath[{}]: 'scope' is only allowed together with 'coordinate'",
                            index
                        )));
                    }
                    if location.trim().is_empty() {
                        return Err(violation(format!("classpath[{}]: 'location' is empty", index)));
                    }
                    builder.location(location)
                }
                (None, Some(coordinate)) => {
                    let scope = match entry.scope {
                        Some(scope) => scope
                            .parse::<Scope>()
                            .map_err(|e| violation(format!("classpath[{}]: {}", index, e)))?,
                        None => Scope::default(),
                    };
                    let coordinate = Coordinate::parse(&coordinate)
                        .map_err(|e| violation(format!("classpath[{}]: {}", index, e)))?
                        .with_scope(scope);
                    builder.coordinate(coordinate)
                }
                _ => {
                    return Err(violation(format!(
                        "classpath[{}]: exactly one of 'location' or 'coordinate' is required",
                        index
                    )));
                }
            };
        }

        let mut targets: Vec<&str> = Vec::new();
        for (index, dependency) in raw.dependencies.iter().enumerate() {
            let target = dependency.component.trim();
            if target.is_empty() {
                return Err(violation(format!("dependencies[{}]: 'component' is empty", index)));
            }
            if !is_valid_id(target) {
                return Err(violation(format!(
                    "dependencies[{}]: '{}' is not a valid component id",
                    index, target
                )));
            }
            if target == id {
                return Err(violation(format!("dependencies[{}]: component depends on itself", index)));
            }
            if targets.contains(&target) {
                return Err(violation(format!(
                    "dependencies[{}]: duplicate dependency on '{}'",
                    index, target
                )));
            }
            targets.push(target);
        }
        for dependency in &raw.dependencies {
            builder = builder.dependency(dependency.component.trim(), dependency.managed);
        }

        for (index, prefix) in raw.exports.iter().enumerate() {
            validate_prefix(prefix).map_err(|e| violation(format!("exports[{}]: {}", index, e)))?;
            builder = builder.export(prefix);
        }

        Ok(builder)
    }
}

/// Whether `path` follows the descriptor naming convention
fn is_descriptor_file(path: &Path) -> bool {
    if DescriptorFormat::from_path(path).is_none() {
        return false;
    }
    match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => stem == constants::DESCRIPTOR_STEM || stem.ends_with(constants::DESCRIPTOR_SUFFIX),
        None => false,
    }
}

/// `billing.component.json` -> `billing`; `billing/component.json` -> `billing`
fn default_id(resource: &Path) -> Option<String> {
    let stem = resource.file_stem()?.to_str()?;
    if stem == constants::DESCRIPTOR_STEM {
        return resource
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .map(str::to_string);
    }
    let id = stem.strip_suffix(constants::DESCRIPTOR_SUFFIX).unwrap_or(stem);
    Some(id.to_string())
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// `a.b.Type`: non-empty segments of identifier characters, none starting with a digit
pub(crate) fn is_dotted_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
                    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
                }
                _ => false,
            }
        })
}

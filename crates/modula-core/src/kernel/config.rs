use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::artifact::{Coordinate, Scope};
use crate::kernel::constants::{CORE_API_NAMESPACE, DEFAULT_REPOSITORY_DIR, REPOSITORY_ENV_VAR};
use crate::kernel::error::{Error, Result};

/// Serialization format of a config or descriptor file, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    #[cfg(feature = "yaml-config")]
    Yaml,
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Canonical extension, without the dot
    pub fn extension(&self) -> &'static str {
        match *self {
            Self::Json => "json",
            #[cfg(feature = "yaml-config")]
            Self::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            Self::Toml => "toml",
        }
    }

    /// `None` for a missing extension or a format compiled out
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            #[cfg(feature = "yaml-config")]
            "yml" | "yaml" => Some(Self::Yaml),
            #[cfg(feature = "toml-config")]
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Free-form configuration values keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigData {
    values: BTreeMap<String, serde_json::Value>,
}

impl ConfigData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed value for `key`, `None` when missing or of another shape
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        T::deserialize(value).ok()
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| Error::Config {
            path: None,
            message: format!("Value for '{}' cannot be stored", key),
            source: Some(Box::new(e)),
        })?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    /// Copy every value of `other` in, replacing values with the same key
    pub fn merge(&mut self, other: &ConfigData) {
        self.values
            .extend(other.values.iter().map(|(key, value)| (key.clone(), value.clone())));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Settings the runtime is bootstrapped from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Root of the local artifact cache
    pub repository: PathBuf,
    /// Directory scanned for component descriptors
    pub components_dir: Option<PathBuf>,
    /// Prefixes the shared context is authoritative for
    pub shared_exports: Vec<String>,
    /// `group:artifact:version` coordinates added to the shared context at boot
    pub shared_dependencies: Vec<String>,
    /// Values handed to activators through the host handle
    pub properties: ConfigData,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            repository: PathBuf::from(DEFAULT_REPOSITORY_DIR),
            components_dir: None,
            shared_exports: vec![CORE_API_NAMESPACE.to_string()],
            shared_dependencies: Vec::new(),
            properties: ConfigData::new(),
        }
    }
}

impl RuntimeConfig {
    /// Parse a configuration document
    pub fn parse_str(content: &str, format: ConfigFormat) -> Result<Self> {
        let parsed = match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        let config: RuntimeConfig = parsed.map_err(|message| {
            Error::config(
                None,
                format!("Invalid {} configuration: {}", format.extension(), message),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, the format follows its extension.
    ///
    /// Relative `repository` and `components_dir` paths are taken relative to
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::config(
                Some(path.to_path_buf()),
                "Unsupported configuration file extension",
            )
        })?;
        let content = fs::read_to_string(path)
            .map_err(|e| Error::io(e, "read configuration", path.to_path_buf()))?;
        let mut config = Self::parse_str(&content, format).map_err(|e| match e {
            Error::Config {
                message, source, ..
            } => Error::Config {
                path: Some(path.to_path_buf()),
                message,
                source,
            },
            other => other,
        })?;

        if let Some(base) = path.parent() {
            if config.repository.is_relative() {
                config.repository = base.join(&config.repository);
            }
            if let Some(dir) = config.components_dir.take() {
                config.components_dir = Some(if dir.is_relative() { base.join(dir) } else { dir });
            }
        }
        log::debug!("Loaded runtime configuration from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides (`MODULA_REPOSITORY`)
    pub fn with_env_overrides(self) -> Self {
        self.with_repository_override(std::env::var(REPOSITORY_ENV_VAR).ok())
    }

    pub(crate) fn with_repository_override(mut self, value: Option<String>) -> Self {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            log::debug!("Repository overridden by {}: {}", REPOSITORY_ENV_VAR, value);
            self.repository = PathBuf::from(value);
        }
        self
    }

    /// Shared dependencies as coordinates with `Share` scope
    pub fn shared_coordinates(&self) -> Result<Vec<Coordinate>> {
        self.shared_dependencies
            .iter()
            .map(|raw| {
                Coordinate::parse(raw)
                    .map(|c| c.with_scope(Scope::Share))
                    .map_err(Error::from)
            })
            .collect()
    }

    fn validate(&self) -> Result<()> {
        for prefix in &self.shared_exports {
            crate::export::registry::validate_prefix(prefix)?;
        }
        self.shared_coordinates()?;
        Ok(())
    }
}

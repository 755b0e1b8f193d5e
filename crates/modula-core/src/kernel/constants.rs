/// Application name
pub const APP_NAME: &str = "Modula";

/// Application version
pub const APP_VERSION: &str = "0.1.0";

/// File stem of a descriptor that takes its id from its directory (`billing/component.json`)
pub const DESCRIPTOR_STEM: &str = "component";

/// Stem suffix of a descriptor that names its own id (`billing.component.json`)
pub const DESCRIPTOR_SUFFIX: &str = ".component";

/// Extension of symbol files inside an exploded archive
pub const SYMBOL_FILE_EXTENSION: &str = "sym";

/// Default local artifact cache, relative to the working directory
pub const DEFAULT_REPOSITORY_DIR: &str = "repository";

/// Environment variable overriding the artifact cache location
pub const REPOSITORY_ENV_VAR: &str = "MODULA_REPOSITORY";

/// Namespace of the host API, exported by the shared context by default
pub const CORE_API_NAMESPACE: &str = "modula.api";

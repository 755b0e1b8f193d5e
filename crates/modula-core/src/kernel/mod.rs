//! # Modula Core Kernel
//!
//! The `kernel` module wires the runtime together and holds what every other
//! subsystem shares.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Bootstrapping**: [`Runtime`](bootstrap::Runtime) creates the export
//!   registry, the coordinate resolver, the shared loading context, the host
//!   handle and the component manager exactly once, and hands each of them to
//!   the parts that need them. Nothing in the crate is a global.
//! - **Host services**: [`HostHandle`](host::HostHandle) is what activators
//!   receive: a type-keyed [`ServiceRegistry`](host::ServiceRegistry) and the
//!   runtime's configuration properties.
//! - **Configuration**: [`RuntimeConfig`](config::RuntimeConfig) and the
//!   format-aware [`ConfigData`](config::ConfigData) in the `config` submodule.
//! - **Core Constants**: naming conventions and defaults in `constants`.
//! - **Error Handling**: the crate-wide [`Error`](error::Error) roll-up and its
//!   `Result` alias in `error`.
pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error;
pub mod host;

pub use bootstrap::Runtime;
pub use config::{ConfigData, ConfigFormat, RuntimeConfig};
pub use error::{Error, Result};
pub use host::{HostHandle, ServiceRegistry};

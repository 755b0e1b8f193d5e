//! # Modula Core Component Specifications
//!
//! Declarative descriptions of components: which archives make up their
//! classpath, which activator type starts them, which other components they
//! depend on and which namespaces they export.
//!
//! ## Key Submodules:
//!
//! - **[`model`]**: [`ComponentSpecification`], [`ComponentDependency`],
//!   [`ClasspathEntry`], [`SpecId`] and the [`SpecificationBuilder`].
//! - **[`parser`]**: descriptor parsing and schema validation
//!   ([`SpecificationParser`]), in JSON and, behind features, TOML and YAML.
//! - **[`error`]**: [`SpecificationError`].
//!
//! Specifications are plain data: they are immutable once built and carry no
//! runtime state. Dependencies are kept as ids and resolved by the component
//! manager when it orders a set of specifications.
pub mod error;
pub mod model;
pub mod parser;

pub use error::SpecificationError;
pub use model::{ClasspathEntry, ComponentDependency, ComponentSpecification, SpecId, SpecificationBuilder};
pub use parser::{DescriptorFormat, SpecificationParser};

// Test module declaration
#[cfg(test)]
mod tests;

//! # Modula Core Export Registry
//!
//! Process-wide routing table from dotted namespace prefixes to the capability
//! (usually a loading context) that is authoritative for them.
//!
//! Lookups walk a name from the most specific ancestor to the least specific
//! one, segment by segment, so a registration for `a.b` covers `a.b.C` and
//! `a.b.c.D` but never `a.bcd`. The table is copy-on-write: symbol resolution
//! on application threads never waits for an install or uninstall.
//!
//! - **[`registry`]**: the [`ExportRegistry`] itself.
//! - **[`error`]**: [`ExportError`].
pub mod error;
pub mod registry;

pub use error::ExportError;
pub use registry::ExportRegistry;

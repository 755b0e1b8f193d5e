//! # Modula Core Loading Contexts
//!
//! Symbol resolution for components. Every running component owns an
//! [`IsolatedContext`] built from its own classpath; the runtime owns a single
//! [`SharedContext`] that libraries with `share` scope are added to.
//!
//! Resolution is two-tiered:
//!
//! 1. The process-wide [`ExportRegistry`](crate::export::ExportRegistry) is
//!    consulted first. If a capability is registered for the symbol's
//!    namespace, that capability's own archives are authoritative, even when the
//!    asking context carries a symbol with the same name.
//! 2. Otherwise the asking context's own archives are searched in classpath
//!    order.
//!
//! There is no parent-first delegation: the shared context only participates
//! through the namespaces it exports. A component may therefore override
//! anything that is not exported, while exported namespaces (core API types,
//! for example) keep a single authoritative definition.
//!
//! ## Key Submodules:
//!
//! - **[`symbol`]**: [`Symbol`] and [`ContextId`]; identity is the
//!   (defining context, name) pair.
//! - **[`archive`]**: the [`Archive`] and [`ArchiveOpener`] seams with directory
//!   and in-memory implementations.
//! - **[`context`]**: the [`SymbolProvider`] and [`LoadingContext`] traits.
//! - **[`shared`]** / **[`isolated`]**: the two context kinds.
//! - **[`error`]**: [`LoadingError`].
pub mod archive;
pub mod context;
pub mod error;
pub mod isolated;
pub mod shared;
pub mod symbol;

pub use archive::{Archive, ArchiveOpener, DirectoryArchive, DirectoryArchiveOpener, MemoryArchive, MemoryArchiveOpener};
pub use context::{Capability, LoadingContext, SymbolProvider};
pub use error::LoadingError;
pub use isolated::IsolatedContext;
pub use shared::SharedContext;
pub use symbol::{ContextId, Symbol};

//! # Modula Core Component System
//!
//! Lifecycle management for components described by
//! [`ComponentSpecification`](crate::specification::ComponentSpecification)s.
//!
//! ## Key Components & Submodules:
//!
//! - **[`manager`]**: [`ComponentManager`] registers specifications and starts
//!   or stops components together with their managed dependencies.
//! - **[`graph`]**: dependency ordering over managed edges, with cycle and
//!   missing-dependency detection.
//! - **[`activator`]**: the [`Activator`] trait components implement and the
//!   [`ActivatorRegistry`] that instantiates them by type name.
//! - **[`error`]**: [`ComponentError`].
pub mod activator;
pub mod error;
pub mod graph;
pub mod manager;

pub use activator::{Activator, ActivatorError, ActivatorFactory, ActivatorRegistry, ActivatorResult};
pub use error::ComponentError;
pub use graph::start_order;
pub use manager::{ComponentManager, RunningComponent};

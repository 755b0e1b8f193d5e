//! # Modula Core Artifact Resolution
//!
//! Maps library coordinates (`group:artifact:version`) to archives in a local
//! artifact cache, and keeps track of what a classpath already contains so the
//! same library is never added twice.
//!
//! ## Key Submodules:
//!
//! - **[`coordinate`]**: [`Coordinate`] and its [`Scope`], plus parsing from the
//!   textual `group:artifact:version` form and version compatibility rules.
//! - **[`classpath`]**: the ordered [`Classpath`] a loading context is built from.
//! - **[`resolver`]**: the [`CoordinateResolver`] seam and the conventional
//!   [`LocalRepositoryResolver`] cache layout.
//! - **[`error`]**: [`ArtifactError`].
//!
//! Fetching missing artifacts over the network is left to whoever populates the
//! cache; resolution here is synchronous and fails fast.
pub mod classpath;
pub mod coordinate;
pub mod error;
pub mod resolver;

pub use classpath::{Classpath, ClasspathElement};
pub use coordinate::{Coordinate, Scope};
pub use error::ArtifactError;
pub use resolver::{CoordinateResolver, LocalRepositoryResolver};

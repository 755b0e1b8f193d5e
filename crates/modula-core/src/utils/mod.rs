//! # Modula Core Utilities
//!
//! Small filesystem helpers shared by descriptor discovery and archive access.
pub mod fs;

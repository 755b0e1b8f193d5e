pub mod artifact;
pub mod component;
pub mod export;
pub mod kernel;
pub mod loading;
pub mod specification;
pub mod utils;

// Re-export key public types for the binary and components
pub use artifact::{Coordinate, CoordinateResolver, LocalRepositoryResolver, Scope};
pub use component::{Activator, ActivatorRegistry, ActivatorResult, ComponentManager};
pub use export::ExportRegistry;
pub use kernel::Runtime;
pub use kernel::error::Error as KernelError;
pub use kernel::host::HostHandle;
pub use loading::{IsolatedContext, LoadingContext, SharedContext, Symbol};
pub use specification::{ComponentSpecification, SpecId, SpecificationParser};

#[cfg(test)]
mod tests;

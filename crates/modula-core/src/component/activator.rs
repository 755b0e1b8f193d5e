use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::kernel::host::HostHandle;
use crate::loading::Symbol;

/// Error type returned by activator callbacks
pub type ActivatorError = Box<dyn StdError + Send + Sync>;

pub type ActivatorResult = Result<(), ActivatorError>;

/// Lifecycle entry point of a component.
///
/// One instance is created per start, `activate` is called once, and
/// `deactivate` once when the component is stopped. Both receive the host so
/// services published on start can be withdrawn on stop.
pub trait Activator: Send {
    fn activate(&mut self, host: &HostHandle) -> ActivatorResult;

    fn deactivate(&mut self, host: &HostHandle) -> ActivatorResult;
}

/// Creates a fresh activator instance
pub type ActivatorFactory = Arc<dyn Fn() -> Box<dyn Activator> + Send + Sync>;

/// Maps activator type names to the code that instantiates them.
///
/// A component's activator name is first resolved to a [`Symbol`] through the
/// component's loading context; the symbol's name then selects the factory.
#[derive(Clone, Default)]
pub struct ActivatorRegistry {
    factories: HashMap<String, ActivatorFactory>,
}

impl ActivatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `type_name`. Returns `true` if it replaced one.
    pub fn register<F>(&mut self, type_name: &str, factory: F) -> bool
    where
        F: Fn() -> Box<dyn Activator> + Send + Sync + 'static,
    {
        let replaced = self
            .factories
            .insert(type_name.to_string(), Arc::new(factory))
            .is_some();
        if replaced {
            log::warn!("Activator factory for '{}' replaced", type_name);
        }
        replaced
    }

    /// Register an activator type constructed through `Default`
    pub fn register_default<A>(&mut self, type_name: &str) -> bool
    where
        A: Activator + Default + 'static,
    {
        self.register(type_name, || Box::new(A::default()))
    }

    /// New activator instance for a resolved activator symbol
    pub fn instantiate(&self, symbol: &Symbol) -> Option<Box<dyn Activator>> {
        self.factories.get(symbol.name()).map(|factory| factory())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for ActivatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivatorRegistry")
            .field("type_names", &self.type_names())
            .finish()
    }
}

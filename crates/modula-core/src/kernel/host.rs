use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use serde::Deserialize;

use crate::kernel::config::ConfigData;

/// Registry of host services, one instance per concrete type.
///
/// Components publish services from `activate` and look up what other
/// components or the host published. Safe to use from any thread.
#[derive(Default)]
pub struct ServiceRegistry {
    services: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `service`, returning the instance it replaced
    pub fn register<T: Any + Send + Sync>(&self, service: Arc<T>) -> Option<Arc<T>> {
        let mut services = self.services.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        services
            .insert(TypeId::of::<T>(), service)
            .and_then(|previous| Arc::downcast::<T>(previous).ok())
    }

    /// Get the service registered for concrete type `T`
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let services = self.services.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        services
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|service| Arc::downcast::<T>(service).ok())
    }

    /// Remove the service registered for `T`
    pub fn unregister<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let mut services = self.services.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        services
            .remove(&TypeId::of::<T>())
            .and_then(|service| Arc::downcast::<T>(service).ok())
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        let services = self.services.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        services.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.services.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.len())
            .finish()
    }
}

/// What the runtime hands to every activator
#[derive(Debug, Default)]
pub struct HostHandle {
    services: ServiceRegistry,
    properties: ConfigData,
}

impl HostHandle {
    pub fn new(properties: ConfigData) -> Self {
        Self {
            services: ServiceRegistry::new(),
            properties,
        }
    }

    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    /// Configuration properties of the runtime
    pub fn properties(&self) -> &ConfigData {
        &self.properties
    }

    /// Typed configuration property
    pub fn property<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.properties.get(key)
    }
}

use std::path::Path;
use std::sync::Arc;

use crate::artifact::{CoordinateResolver, LocalRepositoryResolver};
use crate::component::{ActivatorRegistry, ComponentManager};
use crate::export::ExportRegistry;
use crate::kernel::config::RuntimeConfig;
use crate::kernel::constants::{APP_NAME, APP_VERSION};
use crate::kernel::error::Result;
use crate::kernel::host::HostHandle;
use crate::loading::{ArchiveOpener, Capability, DirectoryArchiveOpener, SharedContext};
use crate::specification::SpecificationParser;

/// A fully wired runtime.
///
/// Created once at startup; owns the export registry, the shared context and
/// the component manager, and hands them to each other by `Arc`.
#[derive(Debug)]
pub struct Runtime {
    config: RuntimeConfig,
    exports: Arc<ExportRegistry<Capability>>,
    shared: Arc<SharedContext>,
    manager: ComponentManager,
}

impl Runtime {
    /// Runtime over exploded directory archives in the configured repository
    pub fn new(config: RuntimeConfig, activators: ActivatorRegistry) -> Result<Self> {
        let resolver: Arc<dyn CoordinateResolver> =
            Arc::new(LocalRepositoryResolver::new(config.repository.clone()));
        Self::with_parts(config, activators, resolver, Arc::new(DirectoryArchiveOpener))
    }

    /// Runtime with a caller-supplied resolver and archive opener
    pub fn with_parts(
        config: RuntimeConfig,
        activators: ActivatorRegistry,
        resolver: Arc<dyn CoordinateResolver>,
        opener: Arc<dyn ArchiveOpener>,
    ) -> Result<Self> {
        log::info!("Initializing {} v{}", APP_NAME, APP_VERSION);

        let exports: Arc<ExportRegistry<Capability>> = Arc::new(ExportRegistry::new());
        let shared = Arc::new(SharedContext::new(
            Arc::clone(&exports),
            Arc::clone(&resolver),
            Arc::clone(&opener),
        ));

        for prefix in &config.shared_exports {
            let capability: Capability = shared.clone();
            exports.add_export(prefix, capability)?;
        }
        for coordinate in config.shared_coordinates()? {
            shared.add_dependency(&coordinate)?;
        }
        log::debug!(
            "Shared context exports {:?} over {} archive(s)",
            exports.prefixes(),
            shared.classpath().len()
        );

        let host = Arc::new(HostHandle::new(config.properties.clone()));
        let manager = ComponentManager::new(Arc::clone(&shared), resolver, opener, activators, host);

        Ok(Self {
            config,
            exports,
            shared,
            manager,
        })
    }

    /// Parse every descriptor under `dir` and register it
    pub fn load_components_from(&mut self, dir: &Path) -> Result<usize> {
        let specs = SpecificationParser::load_directory(dir)?;
        Ok(self.manager.load_components(specs)?)
    }

    /// Load the configured `components_dir`, if any
    pub fn load_configured_components(&mut self) -> Result<usize> {
        match self.config.components_dir.clone() {
            Some(dir) => self.load_components_from(&dir),
            None => Ok(0),
        }
    }

    pub fn start_all(&mut self) -> Result<()> {
        Ok(self.manager.start_all()?)
    }

    /// Stop every running component in reverse start order
    pub fn shutdown(&mut self) -> Result<()> {
        log::info!("Shutting down {}", APP_NAME);
        Ok(self.manager.stop()?)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn exports(&self) -> &Arc<ExportRegistry<Capability>> {
        &self.exports
    }

    pub fn shared_context(&self) -> &Arc<SharedContext> {
        &self.shared
    }

    pub fn host(&self) -> &Arc<HostHandle> {
        self.manager.host()
    }

    pub fn manager(&self) -> &ComponentManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut ComponentManager {
        &mut self.manager
    }
}

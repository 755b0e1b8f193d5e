//! Logging for the Modula runtime.
//!
//! [`init_subscriber`] installs the process-wide `tracing` subscriber and
//! bridges `log` records into it. [`install`] adds the `core-logging`
//! component to a runtime; while running it publishes [`LogSettings`] to the
//! host services and applies the configured `log_level` property.
use std::error::Error;
use std::sync::Arc;

use log::{info, LevelFilter};
use modula_core::component::{Activator, ActivatorResult, ComponentManager};
use modula_core::kernel::error::Result as KernelResult;
use modula_core::kernel::host::HostHandle;
use modula_core::kernel::Runtime;
use modula_core::loading::{Capability, MemoryArchive};
use modula_core::specification::{ComponentSpecification, SpecificationBuilder};
use tracing_subscriber::EnvFilter;

/// Component id
pub const COMPONENT_ID: &str = "core-logging";

/// Namespace the component's types live in
pub const NAMESPACE: &str = "modula.logging";

/// Activator type name
pub const ACTIVATOR_TYPE: &str = "modula.logging.LoggingActivator";

/// Environment variable holding the filter directives, `RUST_LOG` is the fallback
pub const LOG_ENV_VAR: &str = "MODULA_LOG";

/// Host property selecting the `log` level while the component runs
pub const LEVEL_PROPERTY: &str = "log_level";

const ARCHIVE_LOCATION: &str = "builtin:core-logging";

/// Install the global subscriber, writing to stderr.
///
/// Fails if a subscriber or logger is already installed.
pub fn init_subscriber(default_directive: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;
    Ok(())
}

/// Logging settings published while the component runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
}

#[derive(Default)]
pub struct LoggingActivator {
    previous: Option<LevelFilter>,
}

impl Activator for LoggingActivator {
    fn activate(&mut self, host: &HostHandle) -> ActivatorResult {
        let level = match host.property::<String>(LEVEL_PROPERTY) {
            Some(raw) => raw
                .parse::<LevelFilter>()
                .map_err(|_| format!("Invalid {} property '{}'", LEVEL_PROPERTY, raw))?,
            None => log::max_level(),
        };
        self.previous = Some(log::max_level());
        log::set_max_level(level);
        host.services().register(Arc::new(LogSettings { level }));
        info!("Core logging active at level {}", level);
        Ok(())
    }

    fn deactivate(&mut self, host: &HostHandle) -> ActivatorResult {
        info!("Shutting down core logging");
        host.services().unregister::<LogSettings>();
        if let Some(previous) = self.previous.take() {
            log::set_max_level(previous);
        }
        Ok(())
    }
}

/// Specification of the statically linked component
pub fn specification() -> ComponentSpecification {
    SpecificationBuilder::new(COMPONENT_ID, ACTIVATOR_TYPE).build()
}

/// Archive carrying the component's types
pub fn archive() -> MemoryArchive {
    MemoryArchive::new(ARCHIVE_LOCATION).with_symbol(ACTIVATOR_TYPE, COMPONENT_ID)
}

/// Register the activator factory with `manager`
pub fn register(manager: &mut ComponentManager) {
    manager
        .activators_mut()
        .register_default::<LoggingActivator>(ACTIVATOR_TYPE);
}

/// Add the component to `runtime`.
///
/// Its archive joins the shared context, which becomes the exporter of
/// [`NAMESPACE`], and its specification is registered with the manager.
pub fn install(runtime: &mut Runtime) -> KernelResult<()> {
    register(runtime.manager_mut());
    let shared = Arc::clone(runtime.shared_context());
    shared.add_archive(Arc::new(archive()));
    let capability: Capability = shared;
    runtime.exports().add_export(NAMESPACE, capability)?;
    runtime.manager_mut().load_components([specification()])?;
    Ok(())
}

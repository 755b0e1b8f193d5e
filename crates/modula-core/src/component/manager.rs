use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::artifact::CoordinateResolver;
use crate::component::activator::{Activator, ActivatorRegistry, ActivatorResult};
use crate::component::error::ComponentError;
use crate::component::graph;
use crate::export::registry::validate_prefix;
use crate::kernel::host::HostHandle;
use crate::loading::{
    ArchiveOpener, Capability, ContextId, IsolatedContext, LoadingContext, SharedContext, SymbolProvider,
};
use crate::specification::{ComponentSpecification, SpecId};

/// A started component: its live activator and loading context
pub struct RunningComponent {
    spec: Arc<ComponentSpecification>,
    context: Arc<IsolatedContext>,
    activator: Box<dyn Activator>,
}

impl RunningComponent {
    pub fn specification(&self) -> &Arc<ComponentSpecification> {
        &self.spec
    }

    pub fn context(&self) -> &Arc<IsolatedContext> {
        &self.context
    }
}

impl std::fmt::Debug for RunningComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningComponent")
            .field("id", self.spec.id())
            .field("context", self.context.context_id())
            .finish_non_exhaustive()
    }
}

/// Owns registered specifications and drives their lifecycle.
///
/// Starting a component starts its managed dependencies first, each in its own
/// isolated loading context. Stopping it deactivates it and then its managed
/// dependencies, unless another running component still manages them.
#[derive(Debug)]
pub struct ComponentManager {
    specs: HashMap<SpecId, Arc<ComponentSpecification>>,
    registration_order: Vec<SpecId>,
    running: HashMap<SpecId, RunningComponent>,
    start_sequence: Vec<SpecId>,
    /// Earlier owners of taken-over export prefixes, most recent last
    displaced: HashMap<String, Vec<Capability>>,
    shared: Arc<SharedContext>,
    resolver: Arc<dyn CoordinateResolver>,
    opener: Arc<dyn ArchiveOpener>,
    activators: ActivatorRegistry,
    host: Arc<HostHandle>,
}

impl ComponentManager {
    pub fn new(
        shared: Arc<SharedContext>,
        resolver: Arc<dyn CoordinateResolver>,
        opener: Arc<dyn ArchiveOpener>,
        activators: ActivatorRegistry,
        host: Arc<HostHandle>,
    ) -> Self {
        Self {
            specs: HashMap::new(),
            registration_order: Vec::new(),
            running: HashMap::new(),
            start_sequence: Vec::new(),
            displaced: HashMap::new(),
            shared,
            resolver,
            opener,
            activators,
            host,
        }
    }

    /// Register specifications, replacing stopped ones with the same id.
    ///
    /// Fails without registering anything if one of them is running, uses the
    /// shared context's id, or shares an id with another.
    pub fn load_components<I>(&mut self, specs: I) -> Result<usize, ComponentError>
    where
        I: IntoIterator<Item = ComponentSpecification>,
    {
        let specs: Vec<ComponentSpecification> = specs.into_iter().collect();
        let mut seen = HashSet::with_capacity(specs.len());
        for spec in &specs {
            if spec.id().as_str() == ContextId::SHARED {
                return Err(ComponentError::ReservedId(spec.id().to_string()));
            }
            if self.running.contains_key(spec.id()) {
                return Err(ComponentError::AlreadyRunning(spec.id().to_string()));
            }
            if !seen.insert(spec.id().clone()) {
                return Err(ComponentError::DuplicateComponent(spec.id().to_string()));
            }
        }

        let count = specs.len();
        for spec in specs {
            let id = spec.id().clone();
            if self.specs.insert(id.clone(), Arc::new(spec)).is_some() {
                log::debug!("Specification for component '{}' replaced", id);
            } else {
                log::debug!("Registered component '{}'", id);
                self.registration_order.push(id);
            }
        }
        log::info!("Loaded {} component specification(s)", count);
        Ok(count)
    }

    /// Forget a stopped component
    pub fn unload_component(&mut self, id: &str) -> Result<Arc<ComponentSpecification>, ComponentError> {
        if self.running.contains_key(id) {
            return Err(ComponentError::AlreadyRunning(id.to_string()));
        }
        let spec = self
            .specs
            .remove(id)
            .ok_or_else(|| ComponentError::NotRegistered(id.to_string()))?;
        self.registration_order.retain(|registered| registered.as_str() != id);
        log::info!("Unloaded component '{}'", id);
        Ok(spec)
    }

    /// Order `specs` so that managed dependencies come first
    pub fn get_start_order(
        specs: &[Arc<ComponentSpecification>],
    ) -> Result<Vec<Arc<ComponentSpecification>>, ComponentError> {
        graph::start_order(specs)
    }

    /// Start `id` after its managed dependencies.
    ///
    /// Already running components, `id` included, are left as they are.
    /// Dependencies started before a failure stay running.
    pub fn start_component(&mut self, id: &str) -> Result<(), ComponentError> {
        let spec = self
            .specs
            .get(id)
            .cloned()
            .ok_or_else(|| ComponentError::NotRegistered(id.to_string()))?;
        if self.running.contains_key(id) {
            log::debug!("Component '{}' is already running", id);
            return Ok(());
        }

        let order = graph::start_order(&self.managed_closure(&[spec]))?;
        for member in order {
            if !self.running.contains_key(member.id()) {
                self.activate(member)?;
            }
        }
        Ok(())
    }

    /// Stop `id`, then the managed dependencies nothing else still manages.
    ///
    /// Every deactivation is attempted; the first failure is returned.
    pub fn stop_component(&mut self, id: &str) -> Result<(), ComponentError> {
        if !self.specs.contains_key(id) && !self.running.contains_key(id) {
            return Err(ComponentError::NotRegistered(id.to_string()));
        }
        if !self.running.contains_key(id) {
            log::debug!("Component '{}' is not running", id);
            return Ok(());
        }

        let mut failures = Vec::new();
        self.stop_cascade(&SpecId::from(id), &mut failures);
        match failures.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(()),
        }
    }

    /// Start every component that is not managed by another, with its
    /// managed dependencies, in start order.
    pub fn start_all(&mut self) -> Result<(), ComponentError> {
        let registered = self.registered_specifications();
        let order = graph::start_order(&registered)?;
        let roots: Vec<Arc<ComponentSpecification>> = registered
            .into_iter()
            .filter(|spec| !spec.is_managed())
            .collect();
        let wanted: HashSet<SpecId> = self
            .managed_closure(&roots)
            .iter()
            .map(|spec| spec.id().clone())
            .collect();

        for spec in order {
            if wanted.contains(spec.id()) && !self.running.contains_key(spec.id()) {
                self.activate(spec)?;
            }
        }
        log::info!("{} component(s) running", self.running.len());
        Ok(())
    }

    /// Stop all running components in reverse start order.
    pub fn stop(&mut self) -> Result<(), ComponentError> {
        let sequence: Vec<SpecId> = self.start_sequence.iter().rev().cloned().collect();
        let mut failures = Vec::new();
        for id in sequence {
            if let Some(running) = self.running.remove(&id) {
                if let Err(e) = self.deactivate(running) {
                    failures.push(e.to_string());
                }
            }
        }

        if failures.is_empty() {
            log::info!("All components stopped");
            Ok(())
        } else {
            Err(ComponentError::ShutdownIncomplete(failures))
        }
    }

    pub fn is_running(&self, id: &str) -> bool {
        self.running.contains_key(id)
    }

    /// Running component ids in start order
    pub fn running_components(&self) -> Vec<SpecId> {
        self.start_sequence.clone()
    }

    pub fn running_component(&self, id: &str) -> Option<&RunningComponent> {
        self.running.get(id)
    }

    /// Loading context of a running component
    pub fn context_of(&self, id: &str) -> Option<Arc<IsolatedContext>> {
        self.running.get(id).map(|running| Arc::clone(&running.context))
    }

    /// Registered component ids in registration order
    pub fn registered_components(&self) -> Vec<SpecId> {
        self.registration_order.clone()
    }

    pub fn specification(&self, id: &str) -> Option<Arc<ComponentSpecification>> {
        self.specs.get(id).cloned()
    }

    pub fn activators(&self) -> &ActivatorRegistry {
        &self.activators
    }

    pub fn activators_mut(&mut self) -> &mut ActivatorRegistry {
        &mut self.activators
    }

    pub fn host(&self) -> &Arc<HostHandle> {
        &self.host
    }

    fn registered_specifications(&self) -> Vec<Arc<ComponentSpecification>> {
        self.registration_order
            .iter()
            .filter_map(|id| self.specs.get(id).cloned())
            .collect()
    }

    /// `roots` plus every registered component reachable over managed edges.
    /// Unregistered targets are left out for the ordering to report.
    fn managed_closure(&self, roots: &[Arc<ComponentSpecification>]) -> Vec<Arc<ComponentSpecification>> {
        let mut seen = HashSet::new();
        let mut closure = Vec::new();
        let mut pending: Vec<Arc<ComponentSpecification>> = roots.iter().rev().cloned().collect();
        while let Some(spec) = pending.pop() {
            if !seen.insert(spec.id().clone()) {
                continue;
            }
            for dependency in spec.managed_dependencies() {
                if let Some(target) = self.specs.get(&dependency.target) {
                    pending.push(Arc::clone(target));
                }
            }
            closure.push(spec);
        }
        closure
    }

    fn activate(&mut self, spec: Arc<ComponentSpecification>) -> Result<(), ComponentError> {
        let id = spec.id().to_string();
        log::info!("Starting component '{}'", id);

        for prefix in spec.exports() {
            validate_prefix(prefix).map_err(|e| {
                ComponentError::activation(&id, "invalid export", Some(Box::new(e)))
            })?;
        }

        let context = IsolatedContext::from_specification(
            &spec,
            &self.shared,
            self.resolver.as_ref(),
            self.opener.as_ref(),
        )
        .map_err(|e| ComponentError::activation(&id, "loading context could not be built", Some(Box::new(e))))?;
        let context = Arc::new(context);

        let symbol = context.resolve(spec.activator()).map_err(|e| {
            ComponentError::activation(
                &id,
                format!("activator '{}' could not be resolved", spec.activator()),
                Some(Box::new(e)),
            )
        })?;
        let mut activator = self.activators.instantiate(&symbol).ok_or_else(|| {
            ComponentError::activation(
                &id,
                format!("no activator factory registered for '{}'", symbol.name()),
                None,
            )
        })?;

        let host = Arc::clone(&self.host);
        contain(|| activator.activate(&host))
            .map_err(|(message, source)| ComponentError::activation(&id, message, source))?;

        let exports = self.shared.export_registry();
        for prefix in spec.exports() {
            let capability: Capability = context.clone();
            match exports.add_export(prefix, capability) {
                Ok(Some(previous)) => {
                    log::warn!(
                        "Component '{}' took over export '{}' from '{}'",
                        id,
                        prefix,
                        previous.context_id()
                    );
                    self.displaced.entry(prefix.clone()).or_default().push(previous);
                }
                Ok(None) => {}
                Err(e) => log::error!("Export '{}' of component '{}' rejected: {}", prefix, id, e),
            }
        }

        self.start_sequence.push(spec.id().clone());
        self.running.insert(
            spec.id().clone(),
            RunningComponent {
                spec,
                context,
                activator,
            },
        );
        log::info!("Component '{}' started", id);
        Ok(())
    }

    fn stop_cascade(&mut self, id: &SpecId, failures: &mut Vec<ComponentError>) {
        let Some(running) = self.running.remove(id) else {
            return;
        };
        let spec = Arc::clone(&running.spec);
        if let Err(e) = self.deactivate(running) {
            failures.push(e);
        }

        let dependencies: Vec<SpecId> = spec
            .managed_dependencies()
            .map(|dependency| dependency.target.clone())
            .collect();
        for target in dependencies.iter().rev() {
            if let Some(holder) = self.managing_holder(target) {
                log::debug!(
                    "Keeping '{}' running, still managed by '{}'",
                    target,
                    holder
                );
                continue;
            }
            self.stop_cascade(target, failures);
        }
    }

    /// A running component with a managed edge to `target`
    fn managing_holder(&self, target: &SpecId) -> Option<SpecId> {
        self.running
            .values()
            .find(|running| {
                running
                    .spec
                    .managed_dependencies()
                    .any(|dependency| dependency.target == *target)
            })
            .map(|running| running.spec.id().clone())
    }

    /// Drop `owner`'s claim on `prefix`. If it still held the prefix, the most
    /// recent earlier owner that is still around gets it back.
    fn withdraw_export(&mut self, prefix: &str, owner: &ContextId) {
        let exports = self.shared.export_registry();
        let removed = exports.remove_export_if(prefix, |capability| capability.context_id() == owner);

        let Some(stack) = self.displaced.get_mut(prefix) else {
            return;
        };
        stack.retain(|capability| capability.context_id() != owner);
        if removed.is_some() {
            if let Some(previous) = stack.pop() {
                log::info!("Export '{}' returned to '{}'", prefix, previous.context_id());
                if let Err(e) = exports.add_export(prefix, previous) {
                    log::error!("Export '{}' could not be restored: {}", prefix, e);
                }
            }
        }
        if stack.is_empty() {
            self.displaced.remove(prefix);
        }
    }

    /// Withdraw exports still owned by `running`, then deactivate it
    fn deactivate(&mut self, mut running: RunningComponent) -> Result<(), ComponentError> {
        let id = running.spec.id().clone();
        log::info!("Stopping component '{}'", id);
        self.start_sequence.retain(|started| *started != id);

        let owner = running.context.context_id().clone();
        for prefix in running.spec.exports() {
            self.withdraw_export(prefix, &owner);
        }

        let host = Arc::clone(&self.host);
        let activator = &mut running.activator;
        match contain(|| activator.deactivate(&host)) {
            Ok(()) => {
                log::info!("Component '{}' stopped", id);
                Ok(())
            }
            Err((message, source)) => {
                log::error!("Component '{}' failed to deactivate: {}", id, message);
                Err(ComponentError::deactivation(id.as_str(), message, source))
            }
        }
    }
}

type Failure = (String, Option<Box<dyn std::error::Error + Send + Sync>>);

/// Run an activator callback, turning an error or a panic into a failure
fn contain<F>(callback: F) -> Result<(), Failure>
where
    F: FnOnce() -> ActivatorResult,
{
    match panic::catch_unwind(AssertUnwindSafe(callback)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err((e.to_string(), Some(e))),
        Err(payload) => Err((format!("panicked: {}", panic_message(payload.as_ref())), None)),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::artifact::{Classpath, ClasspathElement, Coordinate, CoordinateResolver};
use crate::export::ExportRegistry;
use crate::loading::archive::{Archive, ArchiveOpener};
use crate::loading::context::{find_in_archives, Capability, LoadingContext, SymbolProvider};
use crate::loading::error::LoadingError;
use crate::loading::symbol::{ContextId, Symbol};

#[derive(Default)]
struct SharedState {
    classpath: Classpath,
    archives: Vec<Arc<dyn Archive>>,
}

/// The runtime-wide context libraries with `share` scope are added to.
///
/// Its resolvable set grows at runtime through [`add_dependency`](Self::add_dependency)
/// without restarting anything that already resolves through it.
pub struct SharedContext {
    id: ContextId,
    exports: Arc<ExportRegistry<Capability>>,
    resolver: Arc<dyn CoordinateResolver>,
    opener: Arc<dyn ArchiveOpener>,
    state: RwLock<SharedState>,
}

impl SharedContext {
    pub fn new(
        exports: Arc<ExportRegistry<Capability>>,
        resolver: Arc<dyn CoordinateResolver>,
        opener: Arc<dyn ArchiveOpener>,
    ) -> Self {
        Self {
            id: ContextId::shared(),
            exports,
            resolver,
            opener,
            state: RwLock::new(SharedState::default()),
        }
    }

    /// Resolve `coordinate` and append its archive.
    ///
    /// The archive's namespaces are exported from this context so every
    /// component can reach them, except namespaces another capability already
    /// answers for. Returns the new location, or `None` when a compatible
    /// version is already present.
    pub fn add_dependency(self: &Arc<Self>, coordinate: &Coordinate) -> Result<Option<PathBuf>, LoadingError> {
        let mut state = self.write_state();
        let Some(element) = self.resolver.resolve(&state.classpath, coordinate)? else {
            log::debug!("Shared context already provides {}", coordinate);
            return Ok(None);
        };
        let archive = self.opener.open(&element.location)?;
        let namespaces = namespaces_of(archive.as_ref())?;
        let location = element.location.clone();
        state.archives.push(archive);
        state.classpath.push(element);
        drop(state);

        for namespace in &namespaces {
            self.export_namespace(namespace);
        }
        log::info!("Shared context extended with {} ({})", coordinate, location.display());
        Ok(Some(location))
    }

    fn export_namespace(self: &Arc<Self>, namespace: &str) {
        if let Some(owner) = self.exports.find_capability(namespace) {
            if *owner.context_id() != self.id {
                log::debug!(
                    "Namespace '{}' stays with '{}', not exported from the shared context",
                    namespace,
                    owner.context_id()
                );
            }
            return;
        }
        let capability: Capability = self.clone();
        if let Err(e) = self.exports.add_export(namespace, capability) {
            log::warn!("Shared namespace '{}' not exported: {}", namespace, e);
        }
    }

    /// Append a host-provided archive
    pub fn add_archive(&self, archive: Arc<dyn Archive>) {
        let mut state = self.write_state();
        state.classpath.push(ClasspathElement::location(archive.location()));
        log::debug!("Shared context extended with archive {}", archive.location().display());
        state.archives.push(archive);
    }

    /// The export table shared with every isolated context
    pub fn export_registry(&self) -> &Arc<ExportRegistry<Capability>> {
        &self.exports
    }

    /// Snapshot of the current classpath
    pub fn classpath(&self) -> Classpath {
        self.read_state().classpath.clone()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SharedState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SharedState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Namespaces of the symbols in `archive`: `a.b` for `a.b.Type`, the name
/// itself for an undotted one
fn namespaces_of(archive: &dyn Archive) -> Result<BTreeSet<String>, LoadingError> {
    Ok(archive
        .symbol_names()?
        .into_iter()
        .map(|name| match name.rfind('.') {
            Some(idx) => name[..idx].to_string(),
            None => name,
        })
        .collect())
}

impl SymbolProvider for SharedContext {
    fn context_id(&self) -> &ContextId {
        &self.id
    }

    fn find_local(&self, name: &str) -> Result<Option<Symbol>, LoadingError> {
        let state = self.read_state();
        find_in_archives(&self.id, &state.archives, name)
    }
}

impl LoadingContext for SharedContext {
    fn exports(&self) -> &ExportRegistry<Capability> {
        &self.exports
    }
}

impl fmt::Debug for SharedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedContext")
            .field("id", &self.id)
            .field("classpath", &self.read_state().classpath.locations())
            .finish_non_exhaustive()
    }
}

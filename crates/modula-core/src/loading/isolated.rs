use std::sync::Arc;

use crate::artifact::{Classpath, ClasspathElement, CoordinateResolver, Scope};
use crate::export::ExportRegistry;
use crate::loading::archive::{Archive, ArchiveOpener};
use crate::loading::context::{find_in_archives, Capability, LoadingContext, SymbolProvider};
use crate::loading::error::LoadingError;
use crate::loading::shared::SharedContext;
use crate::loading::symbol::{ContextId, Symbol};
use crate::specification::{ClasspathEntry, ComponentSpecification};

/// Per-component loading context, built once from the component's classpath.
///
/// The shared context is reachable only through the export tier.
#[derive(Debug)]
pub struct IsolatedContext {
    id: ContextId,
    exports: Arc<ExportRegistry<Capability>>,
    classpath: Classpath,
    archives: Vec<Arc<dyn Archive>>,
}

impl IsolatedContext {
    /// Context over already opened archives
    pub fn new(id: ContextId, exports: Arc<ExportRegistry<Capability>>, archives: Vec<Arc<dyn Archive>>) -> Self {
        let mut classpath = Classpath::new();
        for archive in &archives {
            classpath.push(ClasspathElement::location(archive.location()));
        }
        Self {
            id,
            exports,
            classpath,
            archives,
        }
    }

    /// Build the context for `spec`.
    ///
    /// Locations are opened directly (relative ones against the descriptor's
    /// directory). Private coordinates are resolved against this context's own
    /// accumulating classpath; shared ones are handed to `shared`, which
    /// exports their namespaces to every component.
    pub fn from_specification(
        spec: &ComponentSpecification,
        shared: &Arc<SharedContext>,
        resolver: &dyn CoordinateResolver,
        opener: &dyn ArchiveOpener,
    ) -> Result<Self, LoadingError> {
        let mut classpath = Classpath::new();
        let mut archives = Vec::new();

        for entry in spec.classpath() {
            match entry {
                ClasspathEntry::Location(location) => {
                    let location = spec.resolve_location(location);
                    if classpath.contains_location(&location) {
                        continue;
                    }
                    archives.push(opener.open(&location)?);
                    classpath.push(ClasspathElement::location(location));
                }
                ClasspathEntry::Coordinate(coordinate) => match coordinate.scope {
                    Scope::Share => {
                        shared.add_dependency(coordinate)?;
                    }
                    Scope::Private => {
                        if let Some(element) = resolver.resolve(&classpath, coordinate)? {
                            archives.push(opener.open(&element.location)?);
                            classpath.push(element);
                        }
                    }
                },
            }
        }

        log::debug!(
            "Built loading context for '{}' with {} archive(s)",
            spec.id(),
            archives.len()
        );
        Ok(Self {
            id: ContextId::new(spec.id().as_str()),
            exports: Arc::clone(shared.export_registry()),
            classpath,
            archives,
        })
    }

    pub fn classpath(&self) -> &Classpath {
        &self.classpath
    }
}

impl SymbolProvider for IsolatedContext {
    fn context_id(&self) -> &ContextId {
        &self.id
    }

    fn find_local(&self, name: &str) -> Result<Option<Symbol>, LoadingError> {
        find_in_archives(&self.id, &self.archives, name)
    }
}

impl LoadingContext for IsolatedContext {
    fn exports(&self) -> &ExportRegistry<Capability> {
        &self.exports
    }
}

use std::fmt::Debug;
use std::sync::Arc;

use crate::export::ExportRegistry;
use crate::loading::archive::Archive;
use crate::loading::error::LoadingError;
use crate::loading::symbol::{ContextId, Symbol};

/// What the export registry routes to: something that can define symbols
/// from its own archives.
pub type Capability = Arc<dyn SymbolProvider>;

/// A source of symbol definitions
pub trait SymbolProvider: Send + Sync + Debug {
    fn context_id(&self) -> &ContextId;

    /// Look `name` up in this provider's own archives only, in classpath order
    fn find_local(&self, name: &str) -> Result<Option<Symbol>, LoadingError>;
}

/// A symbol-resolution scope with the two-tier lookup
pub trait LoadingContext: SymbolProvider {
    /// The export table consulted before the local tier
    fn exports(&self) -> &ExportRegistry<Capability>;

    /// Resolve `name`: exported namespaces first, then this context's own archives.
    ///
    /// When a capability owns the namespace, its definition is authoritative and
    /// a miss there is not retried locally.
    fn resolve(&self, name: &str) -> Result<Symbol, LoadingError> {
        if let Some(exporter) = self.exports().find_capability(name) {
            log::trace!("'{}' is exported by '{}'", name, exporter.context_id());
            return exporter.find_local(name)?.ok_or_else(|| LoadingError::SymbolNotFound {
                name: name.to_string(),
                context: self.context_id().to_string(),
                exporter: Some(exporter.context_id().to_string()),
            });
        }
        self.find_local(name)?.ok_or_else(|| LoadingError::SymbolNotFound {
            name: name.to_string(),
            context: self.context_id().to_string(),
            exporter: None,
        })
    }
}

/// First definition of `name` among `archives`
pub(crate) fn find_in_archives(
    context: &ContextId,
    archives: &[Arc<dyn Archive>],
    name: &str,
) -> Result<Option<Symbol>, LoadingError> {
    for archive in archives {
        if let Some(content) = archive.load(name)? {
            return Ok(Some(Symbol::new(name, context.clone(), archive.location(), content)));
        }
    }
    Ok(None)
}

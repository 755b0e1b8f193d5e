use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of a loading context: `shared`, or the id of the owning component
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(String);

impl ContextId {
    /// Id of the runtime-wide shared context
    pub const SHARED: &'static str = "shared";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn shared() -> Self {
        Self(Self::SHARED.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved symbol.
///
/// Two symbols are the same definition only if they share both the defining
/// context and the name; content and origin do not take part in identity.
#[derive(Debug, Clone)]
pub struct Symbol {
    name: String,
    defined_by: ContextId,
    origin: PathBuf,
    content: Arc<[u8]>,
}

impl Symbol {
    pub fn new(name: &str, defined_by: ContextId, origin: &Path, content: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            defined_by,
            origin: origin.to_path_buf(),
            content: Arc::from(content),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The context whose archives define this symbol
    pub fn defined_by(&self) -> &ContextId {
        &self.defined_by
    }

    /// Location of the archive the symbol was read from
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.defined_by == other.defined_by && self.name == other.name
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.defined_by.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.defined_by)
    }
}

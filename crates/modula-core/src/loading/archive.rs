use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::kernel::constants;
use crate::loading::error::LoadingError;
use crate::utils::fs::find_files_with_extension;

/// A unit of loadable content on a classpath
pub trait Archive: Send + Sync + Debug {
    /// Where this archive was opened from
    fn location(&self) -> &Path;

    /// Content of symbol `name`, or `None` if this archive does not define it
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>, LoadingError>;

    /// Every symbol name this archive defines, sorted
    fn symbol_names(&self) -> Result<Vec<String>, LoadingError>;
}

/// Turns classpath locations into archives
pub trait ArchiveOpener: Send + Sync + Debug {
    fn open(&self, location: &Path) -> Result<Arc<dyn Archive>, LoadingError>;
}

/// Exploded archive on disk: symbol `a.b.Type` lives at `<root>/a/b/Type.sym`
#[derive(Debug, Clone)]
pub struct DirectoryArchive {
    root: PathBuf,
}

impl DirectoryArchive {
    pub fn open(root: &Path) -> Result<Self, LoadingError> {
        if !root.is_dir() {
            return Err(LoadingError::unreadable(root, "not a directory"));
        }
        Ok(Self { root: root.to_path_buf() })
    }

    /// Relative file for `name`, or `None` if `name` cannot name a file safely
    fn symbol_path(&self, name: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        let mut segments = name.split('.').peekable();
        segments.peek()?;
        while let Some(segment) = segments.next() {
            if segment.is_empty() || segment.contains(['/', '\\']) {
                return None;
            }
            if segments.peek().is_some() {
                path.push(segment);
            } else {
                path.push(format!("{}.{}", segment, constants::SYMBOL_FILE_EXTENSION));
            }
        }
        Some(path)
    }
}

impl Archive for DirectoryArchive {
    fn location(&self) -> &Path {
        &self.root
    }

    fn load(&self, name: &str) -> Result<Option<Vec<u8>>, LoadingError> {
        let Some(path) = self.symbol_path(name) else {
            return Ok(None);
        };
        match fs::read(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LoadingError::ArchiveUnreadable {
                location: self.root.clone(),
                reason: format!("failed to read '{}'", path.display()),
                source: Some(e),
            }),
        }
    }

    fn symbol_names(&self) -> Result<Vec<String>, LoadingError> {
        let files = find_files_with_extension(&self.root, constants::SYMBOL_FILE_EXTENSION).map_err(|source| {
            LoadingError::ArchiveUnreadable {
                location: self.root.clone(),
                reason: "failed to list symbols".to_string(),
                source: Some(source),
            }
        })?;
        let mut names: Vec<String> = files
            .iter()
            .filter_map(|file| {
                let relative = file.strip_prefix(&self.root).ok()?.with_extension("");
                let segments: Option<Vec<&str>> = relative.iter().map(|s| s.to_str()).collect();
                segments.map(|s| s.join("."))
            })
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Opens classpath locations as [`DirectoryArchive`]s
#[derive(Debug, Clone, Default)]
pub struct DirectoryArchiveOpener;

impl ArchiveOpener for DirectoryArchiveOpener {
    fn open(&self, location: &Path) -> Result<Arc<dyn Archive>, LoadingError> {
        Ok(Arc::new(DirectoryArchive::open(location)?))
    }
}

/// Archive held in memory, for statically linked components
#[derive(Debug, Clone)]
pub struct MemoryArchive {
    location: PathBuf,
    symbols: HashMap<String, Vec<u8>>,
}

impl MemoryArchive {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            symbols: HashMap::new(),
        }
    }

    /// Add a symbol
    pub fn with_symbol(mut self, name: &str, content: impl Into<Vec<u8>>) -> Self {
        self.symbols.insert(name.to_string(), content.into());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }
}

impl Archive for MemoryArchive {
    fn location(&self) -> &Path {
        &self.location
    }

    fn load(&self, name: &str) -> Result<Option<Vec<u8>>, LoadingError> {
        Ok(self.symbols.get(name).cloned())
    }

    fn symbol_names(&self) -> Result<Vec<String>, LoadingError> {
        let mut names: Vec<String> = self.symbols.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

/// Serves pre-built in-memory archives by location
#[derive(Debug, Default)]
pub struct MemoryArchiveOpener {
    archives: RwLock<HashMap<PathBuf, Arc<MemoryArchive>>>,
}

impl MemoryArchiveOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `archive` available under its own location
    pub fn insert(&self, archive: MemoryArchive) {
        let mut archives = self.archives.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        archives.insert(archive.location.clone(), Arc::new(archive));
    }
}

impl ArchiveOpener for MemoryArchiveOpener {
    fn open(&self, location: &Path) -> Result<Arc<dyn Archive>, LoadingError> {
        let archives = self.archives.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        match archives.get(location) {
            Some(archive) => Ok(Arc::clone(archive) as Arc<dyn Archive>),
            None => Err(LoadingError::unreadable(location, "no in-memory archive registered at this location")),
        }
    }
}

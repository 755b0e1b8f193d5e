use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::export::error::ExportError;

/// Namespace -> capability table with hierarchical longest-prefix lookup.
///
/// Reads load a snapshot of the table and never block. Writes clone the table,
/// apply the change and swap the new table in.
pub struct ExportRegistry<C> {
    table: ArcSwap<HashMap<String, C>>,
}

impl<C: Clone> ExportRegistry<C> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            table: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Register `capability` for `prefix`, returning the capability it replaced.
    pub fn add_export(&self, prefix: &str, capability: C) -> Result<Option<C>, ExportError> {
        validate_prefix(prefix)?;
        let mut replaced = None;
        self.table.rcu(|current| {
            let mut next = HashMap::clone(current);
            replaced = next.insert(prefix.to_string(), capability.clone());
            next
        });
        if replaced.is_some() {
            log::debug!("Export prefix '{}' re-registered, previous capability replaced", prefix);
        } else {
            log::debug!("Export prefix '{}' registered", prefix);
        }
        Ok(replaced)
    }

    /// Remove the registration for exactly `prefix`.
    ///
    /// Names under `prefix` fall back to the next-longest remaining ancestor.
    pub fn remove_export(&self, prefix: &str) -> Option<C> {
        self.remove_export_if(prefix, |_| true)
    }

    /// Remove the registration for `prefix` only if its current capability
    /// satisfies `predicate`.
    pub fn remove_export_if<F>(&self, prefix: &str, predicate: F) -> Option<C>
    where
        F: Fn(&C) -> bool,
    {
        let mut removed = None;
        self.table.rcu(|current| {
            removed = None;
            match current.get(prefix) {
                Some(capability) if predicate(capability) => {
                    let mut next = HashMap::clone(current);
                    removed = next.remove(prefix);
                    Arc::new(next)
                }
                _ => Arc::clone(current),
            }
        });
        if removed.is_some() {
            log::debug!("Export prefix '{}' removed", prefix);
        }
        removed
    }

    /// Find the capability responsible for `name`.
    ///
    /// Tests `name` itself, then each dotted ancestor from longest to shortest.
    /// The first exact registration wins; no match is `None`.
    pub fn find_capability(&self, name: &str) -> Option<C> {
        let table = self.table.load();
        if table.is_empty() {
            return None;
        }
        let mut candidate = name;
        loop {
            if let Some(capability) = table.get(candidate) {
                return Some(capability.clone());
            }
            match candidate.rfind('.') {
                Some(idx) => candidate = &candidate[..idx],
                None => return None,
            }
        }
    }

    /// Registered prefixes, sorted
    pub fn prefixes(&self) -> Vec<String> {
        let mut prefixes: Vec<String> = self.table.load().keys().cloned().collect();
        prefixes.sort();
        prefixes
    }

    /// Whether `prefix` has an exact registration
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.table.load().contains_key(prefix)
    }

    pub fn len(&self) -> usize {
        self.table.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.load().is_empty()
    }
}

impl<C: Clone> Default for ExportRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ExportRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.load();
        let mut prefixes: Vec<&String> = table.keys().collect();
        prefixes.sort();
        f.debug_struct("ExportRegistry")
            .field("prefixes", &prefixes)
            .finish()
    }
}

/// Check that `prefix` is a dotted name made of non-empty segments.
pub(crate) fn validate_prefix(prefix: &str) -> Result<(), ExportError> {
    if prefix.is_empty() {
        return Err(ExportError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "prefix is empty".to_string(),
        });
    }
    if prefix.split('.').any(|segment| segment.is_empty()) {
        return Err(ExportError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "prefix contains an empty segment".to_string(),
        });
    }
    if prefix.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(ExportError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "prefix contains whitespace or '/'".to_string(),
        });
    }
    Ok(())
}

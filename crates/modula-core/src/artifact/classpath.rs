use std::path::{Path, PathBuf};

use crate::artifact::coordinate::Coordinate;

/// One resolved entry of a classpath
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClasspathElement {
    /// Where the archive lives
    pub location: PathBuf,
    /// The coordinate it was resolved from, if any
    pub coordinate: Option<Coordinate>,
}

impl ClasspathElement {
    /// An entry given directly by location
    pub fn location(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            coordinate: None,
        }
    }

    /// An entry resolved from a coordinate
    pub fn resolved(location: impl Into<PathBuf>, coordinate: Coordinate) -> Self {
        Self {
            location: location.into(),
            coordinate: Some(coordinate),
        }
    }
}

/// Ordered, accumulating list of resolved archives
#[derive(Debug, Clone, Default)]
pub struct Classpath {
    elements: Vec<ClasspathElement>,
}

impl Classpath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: ClasspathElement) {
        self.elements.push(element);
    }

    /// The coordinate already present for `group:artifact`, if any
    pub fn find_artifact(&self, group: &str, artifact: &str) -> Option<&Coordinate> {
        self.elements
            .iter()
            .filter_map(|e| e.coordinate.as_ref())
            .find(|c| c.group == group && c.artifact == artifact)
    }

    pub fn contains_location(&self, location: &Path) -> bool {
        self.elements.iter().any(|e| e.location == location)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClasspathElement> {
        self.elements.iter()
    }

    pub fn locations(&self) -> Vec<PathBuf> {
        self.elements.iter().map(|e| e.location.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

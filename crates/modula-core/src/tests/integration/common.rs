#![cfg(test)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crate::artifact::{Coordinate, LocalRepositoryResolver};
use crate::component::{Activator, ActivatorRegistry, ActivatorResult};
use crate::kernel::bootstrap::Runtime;
use crate::kernel::config::RuntimeConfig;
use crate::kernel::host::HostHandle;

pub type Events = Arc<Mutex<Vec<String>>>;

/// Activator that records its lifecycle calls
pub struct RecordingActivator {
    name: String,
    events: Events,
}

impl Activator for RecordingActivator {
    fn activate(&mut self, _host: &HostHandle) -> ActivatorResult {
        self.events.lock().unwrap().push(format!("activate {}", self.name));
        Ok(())
    }

    fn deactivate(&mut self, _host: &HostHandle) -> ActivatorResult {
        self.events.lock().unwrap().push(format!("deactivate {}", self.name));
        Ok(())
    }
}

/// A components directory and an artifact repository on disk
pub struct Workspace {
    pub root: TempDir,
    pub events: Events,
    pub activators: ActivatorRegistry,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
            events: Arc::new(Mutex::new(Vec::new())),
            activators: ActivatorRegistry::new(),
        }
    }

    pub fn components_dir(&self) -> PathBuf {
        self.root.path().join("components")
    }

    pub fn repository(&self) -> PathBuf {
        self.root.path().join("repository")
    }

    /// Install an exploded artifact containing `symbols`
    pub fn install(&self, coordinate: &str, symbols: &[(&str, &str)]) {
        let coordinate = Coordinate::parse(coordinate).unwrap();
        let artifact = LocalRepositoryResolver::new(self.repository()).artifact_path(&coordinate);
        fs::create_dir_all(&artifact).unwrap();
        for (name, content) in symbols {
            write_symbol(&artifact, name, content);
        }
    }

    /// Write `<id>/component.json` with a `lib` archive holding the activator,
    /// and register a recording factory for it
    pub fn component(&mut self, id: &str, descriptor: &str, symbols: &[(&str, &str)]) {
        let dir = self.components_dir().join(id);
        let lib = dir.join("lib");
        fs::create_dir_all(&lib).unwrap();
        let activator = format!("org.{}.Activator", id);
        write_symbol(&lib, &activator, id);
        for (name, content) in symbols {
            write_symbol(&lib, name, content);
        }
        fs::write(dir.join("component.json"), descriptor).unwrap();

        let events = Arc::clone(&self.events);
        let name = id.to_string();
        self.activators.register(&activator, move || {
            Box::new(RecordingActivator {
                name: name.clone(),
                events: Arc::clone(&events),
            })
        });
    }

    pub fn runtime(&self) -> Runtime {
        let config = RuntimeConfig {
            repository: self.repository(),
            components_dir: Some(self.components_dir()),
            ..RuntimeConfig::default()
        };
        let mut runtime = Runtime::new(config, self.activators.clone()).unwrap();
        runtime.load_configured_components().unwrap();
        runtime
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

pub fn write_symbol(archive: &Path, name: &str, content: &str) {
    let segments: Vec<&str> = name.split('.').collect();
    let mut path = archive.to_path_buf();
    for segment in &segments[..segments.len() - 1] {
        path.push(segment);
    }
    fs::create_dir_all(&path).unwrap();
    path.push(format!("{}.sym", segments[segments.len() - 1]));
    fs::write(path, content).unwrap();
}

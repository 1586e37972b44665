//! Resource registry
//!
//! Owns every resource registered during one discovery run, plus the
//! incidental bookkeeping that hangs off registration: the source and
//! destination directory sets, the optional loader's boot-layer list, and
//! the non-fatal configuration-error log.
//!
//! Precedence contract: [`Registry::start`] is a no-op on a source path that
//! was already claimed. Callers rely on this — processing named packages
//! before the default sweep is the only conflict-resolution rule discovery
//! needs.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::resource::{Layer, Resource};

/// The configured loader module and its boot layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loader {
    /// Fully qualified id of the loader module
    pub mid: String,

    /// Layers to run at loader boot, in registration order
    pub boots: Vec<Layer>,
}

/// Registry of resources claimed during a discovery run
#[derive(Debug, Default)]
pub struct Registry {
    resources: Vec<Resource>,
    by_src: HashMap<PathBuf, usize>,
    by_pqn: HashMap<String, usize>,
    src_dirs: BTreeSet<PathBuf>,
    dest_dirs: BTreeSet<PathBuf>,
    loader: Option<Loader>,
    errors: Vec<String>,
}

impl Registry {
    /// Create an empty registry without a loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with a configured loader module
    pub fn with_loader(mid: impl Into<String>) -> Self {
        Self {
            loader: Some(Loader {
                mid: mid.into(),
                boots: Vec::new(),
            }),
            ..Self::default()
        }
    }

    /// Register a resource; returns `false` when its source is already claimed
    pub fn start(&mut self, resource: Resource) -> bool {
        if self.by_src.contains_key(&resource.src) {
            debug!(src = %resource.src.display(), "source already claimed, skipping");
            return false;
        }

        if let Some(dir) = resource.src_dir() {
            self.src_dirs.insert(dir.to_path_buf());
        }
        if let Some(dir) = resource.dest_dir() {
            self.dest_dirs.insert(dir.to_path_buf());
        }

        let index = self.resources.len();
        self.by_src.insert(resource.src.clone(), index);
        if let Some(pqn) = resource.pqn() {
            self.by_pqn.insert(pqn.to_string(), index);
        }
        self.resources.push(resource);
        true
    }

    /// All registered resources, in registration order
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Look up a resource by source path
    pub fn by_src(&self, src: &Path) -> Option<&Resource> {
        self.by_src.get(src).map(|&i| &self.resources[i])
    }

    /// Look up a module resource by fully qualified name
    pub fn by_pqn(&self, pqn: &str) -> Option<&Resource> {
        self.by_pqn.get(pqn).map(|&i| &self.resources[i])
    }

    pub(crate) fn by_pqn_mut(&mut self, pqn: &str) -> Option<&mut Resource> {
        self.by_pqn.get(pqn).map(|&i| &mut self.resources[i])
    }

    /// Distinct source directories touched by any registered resource
    pub fn src_dirs(&self) -> &BTreeSet<PathBuf> {
        &self.src_dirs
    }

    /// Distinct destination directories touched by any registered resource
    pub fn dest_dirs(&self) -> &BTreeSet<PathBuf> {
        &self.dest_dirs
    }

    /// The configured loader, if any
    pub fn loader(&self) -> Option<&Loader> {
        self.loader.as_ref()
    }

    pub(crate) fn loader_mut(&mut self) -> Option<&mut Loader> {
        self.loader.as_mut()
    }

    /// Record a non-fatal configuration error and keep going
    pub fn log_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("{message}");
        self.errors.push(message);
    }

    /// Configuration errors recorded so far
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Number of registered resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether nothing was registered
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

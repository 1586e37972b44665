//! Resource models for the discovery output
//!
//! A **Resource** is one (source, destination, metadata) record describing a
//! file the build will produce. Module resources additionally carry their
//! resolved module identity; a resource may later have a layer attached when
//! it is the root module of a declared layer.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Resolved identity of an AMD module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Owning package id; empty for the default package
    pub pid: String,

    /// Module id relative to its package (e.g., "sub/util")
    pub mid: String,

    /// Fully qualified module name (e.g., "app/sub/util")
    pub pqn: String,

    /// Logical slash path used for destination mapping
    pub path: String,

    /// Resolved source location
    pub url: PathBuf,

    /// Module dependencies; always empty at discovery time, the
    /// dependency-scanning stage fills it in
    #[serde(default)]
    pub deps: Vec<String>,
}

/// A named bundle of module ids combined into one build artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Fully qualified id of the layer's root module
    pub name: String,

    /// Module ids rolled into the layer, in order
    pub include: Vec<String>,

    /// Whether the layer runs at loader boot time
    pub boot: bool,
}

/// One file to be produced by the build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Absolute source path
    pub src: PathBuf,

    /// Absolute destination path
    pub dest: PathBuf,

    /// Semantic tags set by resource-tag filters before registration
    pub tags: BTreeSet<String>,

    /// Module identity, present only for module resources
    pub module: Option<ModuleInfo>,

    /// Layer attached during layer resolution, if this resource is a
    /// layer's root module
    pub layer: Option<Layer>,
}

impl Resource {
    /// Create a plain (non-module) resource
    pub fn plain(src: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
            tags: BTreeSet::new(),
            module: None,
            layer: None,
        }
    }

    /// Create a module resource from its resolved identity
    pub fn for_module(dest: impl Into<PathBuf>, info: ModuleInfo) -> Self {
        Self {
            src: info.url.clone(),
            dest: dest.into(),
            tags: BTreeSet::new(),
            module: Some(info),
            layer: None,
        }
    }

    /// Whether this resource is a module
    pub fn is_module(&self) -> bool {
        self.module.is_some()
    }

    /// Whether a tag is set on this resource
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains(name)
    }

    /// Set a tag; tags are never cleared once set
    pub fn tag(&mut self, name: impl Into<String>) {
        self.tags.insert(name.into());
    }

    /// The fully qualified module name, for module resources
    pub fn pqn(&self) -> Option<&str> {
        self.module.as_ref().map(|m| m.pqn.as_str())
    }

    /// Source directory of this resource
    pub fn src_dir(&self) -> Option<&Path> {
        self.src.parent()
    }

    /// Destination directory of this resource
    pub fn dest_dir(&self) -> Option<&Path> {
        self.dest.parent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> ModuleInfo {
        ModuleInfo {
            pid: "app".to_string(),
            mid: "util".to_string(),
            pqn: "app/util".to_string(),
            path: "app/util".to_string(),
            url: PathBuf::from("/src/app/util.js"),
            deps: Vec::new(),
        }
    }

    #[test]
    fn test_plain_resource() {
        let resource = Resource::plain("/src/a.png", "/out/a.png");
        assert!(!resource.is_module());
        assert!(resource.tags.is_empty());
        assert_eq!(resource.src_dir(), Some(Path::new("/src")));
        assert_eq!(resource.dest_dir(), Some(Path::new("/out")));
    }

    #[test]
    fn test_module_resource() {
        let resource = Resource::for_module("/out/app/util.js", info());
        assert!(resource.is_module());
        assert_eq!(resource.src, PathBuf::from("/src/app/util.js"));
        assert_eq!(resource.pqn(), Some("app/util"));
        assert!(resource.module.as_ref().unwrap().deps.is_empty());
    }

    #[test]
    fn test_tagging() {
        let mut resource = Resource::plain("/src/a.txt", "/out/a.txt");
        assert!(!resource.has_tag("copyOnly"));
        resource.tag("copyOnly");
        resource.tag("copyOnly");
        assert!(resource.has_tag("copyOnly"));
        assert_eq!(resource.tags.len(), 1);
    }

    #[test]
    fn test_layer_serde_round_trip() {
        let layer = Layer {
            name: "app/main".to_string(),
            include: vec!["app/util".to_string()],
            boot: true,
        };
        let json = serde_json::to_string(&layer).unwrap();
        let back: Layer = serde_json::from_str(&json).unwrap();
        assert_eq!(layer, back);
    }
}

//! Module id resolution
//!
//! Maps fully qualified module ids to source locations and logical paths to
//! destination locations, under the per-package naming rules:
//!
//! - an id equal to a package name resolves to that package's `main` module
//! - an id under `name/` resolves relative to that package's location
//! - anything else belongs to the default package rooted at `base_path`
//!
//! The qualified name (`pqn`) is canonicalized to `pid/mid` (`mid` alone for
//! the default package), so a layer declared as `"app"` and a file discovered
//! as `app/main.js` meet at the same resource.

use std::path::PathBuf;

use crate::config::{BuildConfig, PackageConfig};
use crate::resource::ModuleInfo;

struct PackageEntry {
    config: PackageConfig,
    dest_location: PathBuf,
}

/// Resolver for module ids and logical paths
#[derive(Debug)]
pub struct ModuleMap {
    suffix: String,
    base_path: PathBuf,
    release_dir: PathBuf,
    packages: Vec<PackageEntry>,
}

impl std::fmt::Debug for PackageEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageEntry")
            .field("name", &self.config.name)
            .field("dest_location", &self.dest_location)
            .finish()
    }
}

impl ModuleMap {
    /// Build the map from a profile's packages and roots
    pub fn new(config: &BuildConfig) -> Self {
        let packages = config
            .packages
            .iter()
            .filter(|pack| !pack.is_default())
            .map(|pack| PackageEntry {
                dest_location: pack
                    .dest_location
                    .clone()
                    .unwrap_or_else(|| config.release_dir.join(&pack.name)),
                config: pack.clone(),
            })
            .collect();
        Self {
            suffix: config.module_suffix.clone(),
            base_path: config.base_path.clone(),
            release_dir: config.release_dir.clone(),
            packages,
        }
    }

    /// The module source suffix (".js" unless overridden)
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Look up a package descriptor by id
    pub fn package(&self, pid: &str) -> Option<&PackageConfig> {
        self.packages
            .iter()
            .find(|entry| entry.config.name == pid)
            .map(|entry| &entry.config)
    }

    /// Destination location of a package (release dir for the default one)
    pub fn dest_location(&self, pid: &str) -> PathBuf {
        self.packages
            .iter()
            .find(|entry| entry.config.name == pid)
            .map_or_else(|| self.release_dir.clone(), |e| e.dest_location.clone())
    }

    /// Longest package-name prefix match; returns the entry and the
    /// package-relative remainder of the id
    fn owner<'a>(&'a self, id: &'a str) -> Option<(&'a PackageEntry, &'a str)> {
        let mut best: Option<(&PackageEntry, &str)> = None;
        for entry in &self.packages {
            let name = entry.config.name.as_str();
            let rel = if id == name {
                entry.config.main.as_str()
            } else if let Some(rest) = id
                .strip_prefix(name)
                .and_then(|rest| rest.strip_prefix('/'))
            {
                rest
            } else {
                continue;
            };
            if best.is_none_or(|(b, _)| name.len() > b.config.name.len()) {
                best = Some((entry, rel));
            }
        }
        best
    }

    /// Resolve a fully qualified module id to its source identity
    pub fn resolve_src(&self, fqid: &str) -> ModuleInfo {
        match self.owner(fqid) {
            Some((entry, rel)) => ModuleInfo {
                pid: entry.config.name.clone(),
                mid: rel.to_string(),
                pqn: format!("{}/{rel}", entry.config.name),
                path: format!("{}/{rel}", entry.config.name),
                url: entry.config.location.join(format!("{rel}{}", self.suffix)),
                deps: Vec::new(),
            },
            None => ModuleInfo {
                pid: String::new(),
                mid: fqid.to_string(),
                pqn: fqid.to_string(),
                path: fqid.to_string(),
                url: self.base_path.join(format!("{fqid}{}", self.suffix)),
                deps: Vec::new(),
            },
        }
    }

    /// Resolve a logical module path to its destination location
    pub fn resolve_dest(&self, path: &str) -> PathBuf {
        match self.owner(path) {
            Some((entry, rel)) => entry.dest_location.join(format!("{rel}{}", self.suffix)),
            None => self.release_dir.join(format!("{path}{}", self.suffix)),
        }
    }
}

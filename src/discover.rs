//! Discovery orchestration
//!
//! One [`run`] turns a build profile into the full set of registered
//! resources: named packages first (first claim wins on any overlap), then
//! the implicit default package, then the global tree/dir/file directives,
//! then layer resolution and boot wiring, and finally the advisory
//! cleanup-root computation. All run-scoped state (visited memo, registry,
//! directory sets) lives here and is discarded with the report.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::BuildConfig;
use crate::error::Result;
use crate::filter::PredicateRegistry;
use crate::module::ModuleMap;
use crate::package::PackageProcessor;
use crate::registry::Registry;
use crate::resource::{Layer, Resource};
use crate::walker::TreeWalker;

/// The outcome of one discovery run
#[derive(Debug)]
pub struct DiscoveryReport {
    /// Every registered resource plus loader boots and the error log
    pub registry: Registry,

    /// Minimal prefix-free set of destination roots a later cleanup pass
    /// would clear before writing; nothing is deleted here
    pub cleanup_roots: Vec<PathBuf>,
}

impl DiscoveryReport {
    /// All discovered resources, in registration order
    pub fn resources(&self) -> &[Resource] {
        self.registry.resources()
    }

    /// Non-fatal configuration errors hit during the run
    pub fn errors(&self) -> &[String] {
        self.registry.errors()
    }
}

/// Run discovery over a build profile
pub fn run(config: &BuildConfig, predicates: &PredicateRegistry) -> Result<DiscoveryReport> {
    let map = ModuleMap::new(config);
    let mut walker = TreeWalker::new();
    let mut registry = match &config.loader {
        Some(mid) => Registry::with_loader(mid.clone()),
        None => Registry::new(),
    };

    // named packages claim their files before the default package can;
    // the registry's first-claim rule and the walker's memo make this the
    // only conflict resolution needed
    let processor = PackageProcessor::new(&map, predicates);
    for pack in &config.packages {
        processor.process(pack, &mut walker, &mut registry)?;
    }
    if !config.packages.iter().any(|pack| pack.is_default()) {
        processor.process(&config.default_package(), &mut walker, &mut registry)?;
    }

    apply_global_directives(config, &mut walker, &mut registry)?;
    resolve_layers(config, &map, &mut registry);

    let cleanup_roots = cleanup_roots(registry.dest_dirs());
    debug!(
        resources = registry.len(),
        roots = cleanup_roots.len(),
        "discovery complete"
    );
    Ok(DiscoveryReport {
        registry,
        cleanup_roots,
    })
}

/// Global (unscoped) directives, in fixed trees -> dirs -> files order
fn apply_global_directives(
    config: &BuildConfig,
    walker: &mut TreeWalker,
    registry: &mut Registry,
) -> Result<()> {
    let mut register = |src: &Path, dest: &Path| {
        registry.start(Resource::plain(src, dest));
    };
    for directive in &config.trees {
        walker.tree_directive(directive, &mut register)?;
    }
    for directive in &config.dirs {
        walker.dir_directive(directive, &mut register)?;
    }
    for directive in &config.files {
        walker.file_directive(directive, &mut register);
    }
    Ok(())
}

/// Attach declared layers to their root resources and wire boot layers
///
/// Both failure modes are configuration errors logged on the registry; the
/// specific layer is skipped and the run continues.
fn resolve_layers(config: &BuildConfig, map: &ModuleMap, registry: &mut Registry) {
    for (mid, declared) in &config.layers {
        let pqn = map.resolve_src(mid).pqn;
        if registry.by_pqn(&pqn).is_none() {
            registry.log_error(format!("unable to find the resource for layer ({mid})"));
            continue;
        }

        let mut layer = Layer {
            name: mid.clone(),
            include: declared.include.clone(),
            boot: declared.boot,
        };
        let boot_wired = layer.boot && registry.loader().is_some();
        if layer.boot && !boot_wired {
            registry.log_error(format!("unable to find loader for boot layer ({mid})"));
        }
        if boot_wired {
            // a boot layer always carries its own root module
            layer.include.insert(0, mid.clone());
        }

        if let Some(resource) = registry.by_pqn_mut(&pqn) {
            resource.layer = Some(layer.clone());
        }
        if boot_wired {
            if let Some(loader) = registry.loader_mut() {
                loader.boots.push(layer);
            }
        }
    }
}

/// Reduce the touched destination directories to the minimal set in which
/// no retained directory is a descendant of another
fn cleanup_roots(dest_dirs: &BTreeSet<PathBuf>) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();
    for dir in dest_dirs {
        // dest_dirs is sorted component-wise, so a descendant always
        // directly follows one of its ancestors
        if !roots.last().is_some_and(|root| dir.starts_with(root)) {
            roots.push(dir.clone());
        }
    }
    roots
}

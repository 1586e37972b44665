//! Per-package discovery
//!
//! Walks a package's root tree, classifies everything found into module
//! candidates and plain assets, reconciles the package's explicit module
//! declarations against the natural discoveries, registers the resulting
//! resources (tagged), and finally layers the package's own tree/dir/file
//! directives on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{Directive, ModuleDecl, PackageConfig};
use crate::error::Result;
use crate::filter::PredicateRegistry;
use crate::module::ModuleMap;
use crate::path_utils::to_forward_slashes;
use crate::registry::Registry;
use crate::resource::{ModuleInfo, Resource};
use crate::tagger::ResourceTagger;
use crate::walker::TreeWalker;

/// Synthesized root-tree excludes: hidden files/directories and backup files
const DEFAULT_TREE_EXCLUDES: &[&str] = &[r"/\.", r"~$"];

/// Anchor the synthesized excludes to the package location
///
/// Excludes match against the full normalized path, so the patterns must only
/// see the part below the root; a dot-named ancestor of the location itself
/// (temp directories, `~/.config` checkouts) must not prune the whole tree.
fn default_excludes(location: &Path) -> Vec<String> {
    let root = regex::escape(&to_forward_slashes(location));
    DEFAULT_TREE_EXCLUDES
        .iter()
        .map(|pattern| format!("^{root}.*{pattern}"))
        .collect()
}

/// Processes one package into registered resources
#[derive(Debug)]
pub struct PackageProcessor<'a> {
    map: &'a ModuleMap,
    predicates: &'a PredicateRegistry,
}

impl<'a> PackageProcessor<'a> {
    /// Create a processor over the run's module map and predicate registry
    pub fn new(map: &'a ModuleMap, predicates: &'a PredicateRegistry) -> Self {
        Self { map, predicates }
    }

    /// Discover and register everything the package contributes
    pub fn process(
        &self,
        pack: &PackageConfig,
        walker: &mut TreeWalker,
        registry: &mut Registry,
    ) -> Result<()> {
        debug!(package = %pack.name, location = %pack.location.display(), "processing package");

        let tree = self.root_tree(pack);
        let mut filenames: Vec<PathBuf> = Vec::new();
        walker.tree_directive(&tree, &mut |src: &Path, _dest: &Path| {
            filenames.push(src.to_path_buf());
        })?;

        let (modules, assets) = self.reconcile(pack, &filenames);

        let tagger = ResourceTagger::new(&pack.resource_tags, self.predicates)?;

        for info in modules.into_values() {
            let dest = self.map.resolve_dest(&info.path);
            let mut resource = Resource::for_module(dest, info);
            tagger.apply(&mut resource);
            registry.start(resource);
        }

        let dest_location = self.map.dest_location(&pack.name);
        let prefix_len = pack.prefix().len();
        for (id, src) in assets {
            let mut resource = Resource::plain(src, dest_location.join(&id[prefix_len..]));
            tagger.apply(&mut resource);
            registry.start(resource);
        }

        // explicit directives layer on top, exactly like top-level ones:
        // untagged, and bypassing module classification
        let mut register = |src: &Path, dest: &Path| {
            registry.start(Resource::plain(src, dest));
        };
        for directive in &pack.trees {
            walker.tree_directive(directive, &mut register)?;
        }
        for directive in &pack.dirs {
            walker.dir_directive(directive, &mut register)?;
        }
        for directive in &pack.files {
            walker.file_directive(directive, &mut register);
        }
        Ok(())
    }

    /// The package root's tree directive: an explicit one whose source equals
    /// the package location, else a synthesized default
    fn root_tree(&self, pack: &PackageConfig) -> Directive {
        pack.trees
            .iter()
            .find(|tree| tree.src == pack.location)
            .cloned()
            .unwrap_or_else(|| {
                Directive::with_excludes(
                    &pack.location,
                    self.map.dest_location(&pack.name),
                    default_excludes(&pack.location),
                )
            })
    }

    /// Classify discovered files and reconcile explicit module declarations
    ///
    /// Produces two disjoint maps: module candidates keyed by qualified name,
    /// plain assets keyed by prefixed relative id. An explicit declaration
    /// always wins over a same-id natural discovery of either kind.
    fn reconcile(
        &self,
        pack: &PackageConfig,
        filenames: &[PathBuf],
    ) -> (BTreeMap<String, ModuleInfo>, BTreeMap<String, PathBuf>) {
        let prefix = pack.prefix();
        let suffix = self.map.suffix();
        let main_url = (!pack.is_default()).then(|| self.map.resolve_src(&pack.name).url);

        let mut modules: BTreeMap<String, ModuleInfo> = BTreeMap::new();
        let mut assets: BTreeMap<String, PathBuf> = BTreeMap::new();

        for filename in filenames {
            let Ok(rel) = filename.strip_prefix(&pack.location) else {
                continue;
            };
            let rel = to_forward_slashes(rel);
            if let Some(stem) = rel.strip_suffix(suffix) {
                // the package's own main module keeps its bare package id
                let info = if main_url.as_deref() == Some(filename.as_path()) {
                    self.map.resolve_src(&pack.name)
                } else {
                    self.map.resolve_src(&format!("{prefix}{stem}"))
                };
                modules.insert(info.pqn.clone(), info);
            } else {
                assets.insert(format!("{prefix}{rel}"), filename.clone());
            }
        }

        for (rel_id, decl) in &pack.modules {
            let fqid = format!("{prefix}{rel_id}");
            let mut info = self.map.resolve_src(&fqid);
            if let ModuleDecl::Path(path) = decl {
                info.url = path.clone();
            }
            assets.remove(&fqid);
            modules.insert(info.pqn.clone(), info);
        }

        (modules, assets)
    }
}

//! Directory tree walking
//!
//! [`TreeWalker`] owns the directory-visited memo for one discovery run: a
//! subtree is never traversed twice, even when reachable through two
//! different configured entries. Discovered files are handed to a caller
//! callback with their computed destination (the path suffix beyond the
//! walked root, re-appended onto the destination root), which serves both
//! direct registration and the package processor's advisory collection.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::Directive;
use crate::error::Result;
use crate::filter::Filter;
use crate::path_utils::to_forward_slashes;

/// Recursive directory walker with an exclusion filter and a visited memo
#[derive(Debug, Default)]
pub struct TreeWalker {
    visited: HashSet<PathBuf>,
}

impl TreeWalker {
    /// Create a walker with an empty memo
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `src_dir`, emitting `(source, destination)` for every kept file
    ///
    /// No-op when `src_dir` has already been visited this run. Children whose
    /// normalized full path matches `excludes` are skipped; excluded or
    /// already-visited directories are pruned whole. Without `recursive`,
    /// only direct children are listed.
    pub fn walk<F>(
        &mut self,
        src_dir: &Path,
        dest_dir: &Path,
        excludes: &Filter,
        recursive: bool,
        emit: &mut F,
    ) -> Result<()>
    where
        F: FnMut(&Path, &Path),
    {
        if !self.visited.insert(src_dir.to_path_buf()) {
            debug!(dir = %src_dir.display(), "already walked, skipping");
            return Ok(());
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut iter = WalkDir::new(src_dir)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = iter.next() {
            let entry = entry?;
            let path = entry.path();
            let is_dir = entry.file_type().is_dir();

            if excludes.matches(&to_forward_slashes(path)) {
                if is_dir {
                    iter.skip_current_dir();
                }
                continue;
            }

            if is_dir {
                // only a descended directory enters the memo
                if recursive && !self.visited.insert(path.to_path_buf()) {
                    iter.skip_current_dir();
                }
                continue;
            }

            let Ok(rel) = path.strip_prefix(src_dir) else {
                continue;
            };
            emit(path, &dest_dir.join(rel));
        }
        Ok(())
    }

    /// Apply a file directive: one explicit source/destination pair, no walk
    pub fn file_directive<F>(&mut self, directive: &Directive, emit: &mut F)
    where
        F: FnMut(&Path, &Path),
    {
        emit(&directive.src, &directive.dest);
    }

    /// Apply a dir directive: non-recursive walk with the directive's excludes
    pub fn dir_directive<F>(&mut self, directive: &Directive, emit: &mut F) -> Result<()>
    where
        F: FnMut(&Path, &Path),
    {
        let excludes = Filter::from_tokens(&directive.excludes, 0)?;
        self.walk(&directive.src, &directive.dest, &excludes, false, emit)
    }

    /// Apply a tree directive: recursive walk with the directive's excludes
    pub fn tree_directive<F>(&mut self, directive: &Directive, emit: &mut F) -> Result<()>
    where
        F: FnMut(&Path, &Path),
    {
        let excludes = Filter::from_tokens(&directive.excludes, 0)?;
        self.walk(&directive.src, &directive.dest, &excludes, true, emit)
    }
}

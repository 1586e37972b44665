//! Shared fixtures for integration tests

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// An on-disk build tree rooted in a temp directory
pub struct BuildTree {
    temp: TempDir,
}

impl BuildTree {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.temp.path().join(rel)
    }

    /// Write a file under the tree root, creating parent directories
    pub fn file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, contents).expect("Failed to write fixture file");
        path
    }

    /// Create an (empty) directory under the tree root
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).expect("Failed to create directory");
        path
    }
}

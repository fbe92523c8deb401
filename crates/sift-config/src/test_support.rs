//! Config file fixtures for sift-config unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// A temporary directory tree that config files can be dropped into.
pub struct Fixture {
    /// Owns the tree; removed on drop.
    tmp: TempDir,
}

impl Fixture {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            tmp: tempfile::tempdir().unwrap(),
        }
    }

    /// Top of the tree.
    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// Makes sure `rel` exists as a directory and returns its path.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let dir = self.root().join(rel);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Writes `.sift.toml` into `rel` with the given contents.
    pub fn config(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.dir(rel).join(CONFIG_FILENAME);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Writes a `.sift.toml` that sets nothing.
    pub fn empty_config(&self, rel: &str) -> PathBuf {
        self.config(rel, "# nothing set\n")
    }

    /// Writes a `.sift.toml` that stops discovery.
    pub fn root_config(&self, rel: &str) -> PathBuf {
        self.config(rel, "root = true\n")
    }
}

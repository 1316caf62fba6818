//! [`MirrorFixture`] builder for sync scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::tree::{self, Node};

/// A temporary directory holding a `source` tree and a `replica` path.
///
/// The source directory is created up front; the replica is left for the
/// test to create or not.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::MirrorFixture;
///
/// let fixture = MirrorFixture::new()
///     .with_source_file("a.txt", "hello")
///     .with_source_file("sub/b.txt", "world");
/// // run a pass from fixture.source() into fixture.replica() ...
/// fixture.assert_mirrored();
/// ```
pub struct MirrorFixture {
    temp_dir: TempDir,
    source: PathBuf,
    replica: PathBuf,
}

impl Default for MirrorFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl MirrorFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source");
        let replica = temp_dir.path().join("replica");
        fs::create_dir_all(&source).unwrap();
        Self {
            temp_dir,
            source,
            replica,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn replica(&self) -> &Path {
        &self.replica
    }

    /// Create the replica directory, empty.
    pub fn with_empty_replica(self) -> Self {
        fs::create_dir_all(&self.replica).unwrap();
        self
    }

    pub fn with_source_file(self, relative: &str, content: &str) -> Self {
        self.write_source(relative, content);
        self
    }

    pub fn with_replica_file(self, relative: &str, content: &str) -> Self {
        self.write_replica(relative, content);
        self
    }

    pub fn with_source_dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.source.join(relative)).unwrap();
        self
    }

    pub fn with_replica_dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.replica.join(relative)).unwrap();
        self
    }

    /// Write a source file, creating parent directories.
    pub fn write_source(&self, relative: &str, content: &str) {
        write_with_parents(&self.source.join(relative), content);
    }

    /// Write a replica file, creating parent directories.
    pub fn write_replica(&self, relative: &str, content: &str) {
        write_with_parents(&self.replica.join(relative), content);
    }

    pub fn read_replica(&self, relative: &str) -> String {
        let path = self.replica.join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    pub fn replica_snapshot(&self) -> BTreeMap<String, Node> {
        tree::snapshot(&self.replica)
    }

    /// Assert that the replica is an exact copy of the source.
    pub fn assert_mirrored(&self) {
        tree::assert_mirrored(&self.source, &self.replica);
    }

    /// Assert that `relative` (under the replica) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_replica_exists(&self, relative: &str) {
        let path = self.replica.join(relative);
        assert!(path.exists(), "Expected path to exist: {}", path.display());
    }

    /// Assert that `relative` (under the replica) does **not** exist.
    pub fn assert_replica_missing(&self, relative: &str) {
        let path = self.replica.join(relative);
        assert!(!path.exists(), "Expected path NOT to exist: {}", path.display());
    }
}

fn write_with_parents(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

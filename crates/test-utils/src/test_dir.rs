//! Temporary data directories for tests.
//!
//! [`TestDir`] wraps [`tempfile::TempDir`] and knows where the ledger keeps its
//! database file, so persistence tests can reopen the same store.

// Panicking is how a test helper reports setup failure
#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use ballot_ledger_types::config::StorageConfig;
use tempfile::TempDir;

/// A managed temporary data directory.
///
/// The directory is removed when this struct is dropped.
///
/// # Example
///
/// ```
/// use ballot_ledger_test_utils::TestDir;
///
/// let dir = TestDir::new();
/// let db_path = dir.db_path();
/// assert!(db_path.starts_with(dir.path()));
/// ```
pub struct TestDir {
    inner: TempDir,
}

impl TestDir {
    /// Creates a new temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let inner = tempfile::Builder::new()
            .prefix("ballot-ledger-")
            .tempdir()
            .expect("failed to create temp directory");
        Self { inner }
    }

    /// Returns the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Joins a relative path onto the temporary directory.
    #[must_use]
    pub fn join<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.inner.path().join(path)
    }

    /// Path of the database file under the default storage configuration.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.join(StorageConfig::default().file_name)
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

//! Testing utilities for tagnarrow
//!
//! This module provides helper types and functions for writing tests,
//! including a `TestDb` wrapper for temporary database management.
//!
//! Only available when compiled with `cfg(test)`.

use crate::db::Database;
use crate::engine::Record;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Wrapper for a temporary test database that cleans up on drop
///
/// The store lives in its own temporary directory, which is removed when the
/// wrapper goes out of scope.
pub struct TestDb {
    // Declared before `dir` so the database closes before the directory goes away
    db: Database,
    path: PathBuf,
    dir: TempDir,
}

impl TestDb {
    /// Create a new empty test database
    ///
    /// # Panics
    /// Panics if the temporary directory or the database cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("store");
        let db = Database::open(&path).expect("Failed to open test database");
        Self { db, path, dir }
    }

    /// Get a reference to the underlying database
    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    /// Get the path to the test database
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory that holds the database, usable for sibling fixture files
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for TestDb {
    fn default() -> Self {
        Self::new()
    }
}

/// Two records sharing a `pwd` tag, one `project` and one `personal`
#[must_use]
pub fn sample_records() -> Vec<Record> {
    vec![
        Record::new(
            vec!["pwd".into(), "project".into()],
            vec!["a".to_string(), "b".to_string()],
        ),
        Record::new(
            vec!["pwd".into(), "personal".into()],
            vec!["a".to_string(), "b".to_string()],
        ),
    ]
}

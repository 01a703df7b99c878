//! On-disk selection snapshot

use super::{Result, SessionError};
use crate::engine::SelectionState;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A JSON file holding one [`SelectionState`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored state; a missing file means no prior session
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the file exists but cannot be read, or
    /// `SessionError::Corrupt` if it is not a valid snapshot.
    pub fn load(&self) -> Result<Option<SelectionState>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state = serde_json::from_str(&content).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "loaded selection snapshot");
        Ok(Some(state))
    }

    /// Write `state` as pretty JSON, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if serialization or writing fails.
    pub fn save(&self, state: &SelectionState) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(state)?)?;
        tracing::debug!(path = %self.path.display(), "saved selection snapshot");
        Ok(())
    }

    /// Delete the file; returns whether one existed
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

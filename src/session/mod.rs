//! Persistent selection sessions
//!
//! A [`Session`] pairs an [`Engine`] with a [`SnapshotFile`] so a selection
//! survives between command invocations. Opening a session resumes from the
//! snapshot when one exists; every operation goes through [`Session::apply`].
//!
//! ```text
//! open(records, file) ──► snapshot? ──yes──► Engine::initialize(records, Some(prior))
//!                                   └─no───► Engine::initialize(records, None)
//! apply(op) ──► Engine op ──► persist() ──► file
//! ```

pub mod snapshot;

pub use snapshot::SnapshotFile;

use crate::engine::{Engine, Record, SelectionState};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors raised while reading or writing a session snapshot
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Session file {path} is not a valid snapshot: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// One selection operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOp {
    /// Add one tag
    Select(String),
    /// Drop every listed tag
    Remove(Vec<String>),
    /// Replace the selection verbatim
    Override(Vec<String>),
}

/// Engine state backed by a snapshot file
#[derive(Debug)]
pub struct Session {
    engine: Engine,
    file: SnapshotFile,
    resumed: bool,
}

impl Session {
    /// Open a session over `records`, resuming from `file` if it holds a snapshot
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the snapshot exists but cannot be read.
    pub fn open(records: Vec<Record>, file: SnapshotFile) -> Result<Self> {
        let prior = file.load()?;
        let resumed = prior.is_some();
        Ok(Self {
            engine: Engine::initialize(records, prior),
            file,
            resumed,
        })
    }

    /// Run `op` against the engine and return the new state
    pub fn apply(&mut self, op: SelectionOp) -> &SelectionState {
        tracing::debug!(?op, "applying selection operation");
        match op {
            SelectionOp::Select(tag) => self.engine.select_tag(tag),
            SelectionOp::Remove(tags) => self.engine.remove_tags(&tags),
            SelectionOp::Override(tags) => self.engine.override_selected_tags(tags),
        }
    }

    /// Write the current state to the snapshot file
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the file cannot be written.
    pub fn persist(&self) -> Result<()> {
        self.file.save(self.engine.state())
    }

    /// Clear the selection and delete the snapshot file
    ///
    /// The record collection is kept.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the file cannot be removed.
    pub fn reset(&mut self) -> Result<&SelectionState> {
        self.file.clear()?;
        let records = self.engine.state().records().to_vec();
        self.engine = Engine::initialize(records, None);
        self.resumed = false;
        Ok(self.engine.state())
    }

    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        self.engine.state()
    }

    #[must_use]
    pub const fn file(&self) -> &SnapshotFile {
        &self.file
    }

    /// Whether this session was restored from an existing snapshot
    #[must_use]
    pub const fn is_resumed(&self) -> bool {
        self.resumed
    }
}

//! tagnarrow - narrow a collection of tagged records one tag at a time
//!
//! The core is the [`engine`]: given records that each carry a tag list and a
//! payload, it tracks a set of selected tags and recomputes, after every
//! change, which records carry all of them and which further tags could still
//! narrow the result.
//!
//! Around it sit collaborators that never touch the matching logic:
//!
//! - [`adapters`]: JSON, CSV and store import/export of record collections
//! - [`db`]: a sled-backed record/tag store with its own AND lookup
//! - [`session`]: snapshot persistence so a selection survives between runs
//! - [`cli`], [`commands`], [`config`], [`logging`], [`output`]: the binary

use thiserror::Error;

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod completions;
pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod output;
pub mod session;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum TagnarrowError {
    /// Store error
    #[error("Database error: {0}")]
    DbError(#[from] db::DbError),
    /// Malformed record data
    #[error("Record error: {0}")]
    RecordError(#[from] engine::RecordError),
    /// Import or export failure
    #[error("{0}")]
    AdapterError(#[from] adapters::AdapterError),
    /// Snapshot read or write failure
    #[error("Session error: {0}")]
    SessionError(#[from] session::SessionError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

//! Record validation errors
//!
//! Raised only when a record collection arrives as untyped JSON and cannot be
//! read as a sequence of records. Every selection operation is total, so this
//! is the engine's whole failure surface.

use thiserror::Error;

/// Errors raised while reading a record collection
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The collection itself is not a JSON array
    #[error("Record collection must be an array")]
    NotAnArray,

    /// One entry could not be read as a record
    #[error("Record at index {index} is malformed: {reason}")]
    Malformed { index: usize, reason: String },
}

impl RecordError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            index,
            reason: reason.into(),
        }
    }

    /// Index of the offending record, if the error names one
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::NotAnArray => None,
            Self::Malformed { index, .. } => Some(*index),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;

//! Database-specific error types
//!
//! This module defines all error types that can occur during store operations.
//!
//! # Error Types
//!
//! - **`SledError`**: Errors from the underlying sled embedded database
//! - **`DecodeError`** / **`EncodeError`**: bincode failures on stored rows
//! - **`SerializeError`**: payload text that is not valid JSON, or a malformed key
//! - **`NotFound`**, **`AlreadyExists`**, **`InvalidInput`**: rejected requests

use thiserror::Error;

/// Database-specific errors
#[derive(Debug, Error)]
pub enum DbError {
    /// Represents a sled database error
    #[error("Database error: {0}")]
    SledError(#[from] sled::Error),

    /// Represents a bincode decoding error
    #[error("Error while decoding data: {0}")]
    DecodeError(#[from] bincode::error::DecodeError),

    /// Represents a bincode encoding error
    #[error("Error while encoding data: {0}")]
    EncodeError(#[from] bincode::error::EncodeError),

    /// Generic serialization/deserialization error
    #[error("Error during serialization: {0}")]
    SerializeError(String),

    /// Referenced record or tag does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violated (tag names)
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Invalid input provided (e.g., empty title or invalid regex)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializeError(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;

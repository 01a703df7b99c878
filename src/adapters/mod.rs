//! Record adapters
//!
//! Translate between native data formats and the engine's [`Record`] shape.
//! Adapters never share code with the engine's matcher; they only produce and
//! consume record collections.
//!
//! - [`JsonAdapter`]: JSON arrays of `{ tags, payload }` objects
//! - [`CsvAdapter`]: two-column `tags,payload` tables
//! - [`StoreAdapter`]: the sled-backed record/tag store
//!
//! Anything that can hand over a full collection implements [`RecordSource`].

pub mod csv;
pub mod json;
pub mod store;

pub use self::csv::CsvAdapter;
pub use self::json::JsonAdapter;
pub use self::store::{ImportOptions, ImportReport, StoreAdapter};

use crate::db::DbError;
use crate::engine::{Record, RecordError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading or writing record collections
#[derive(Debug, Error)]
pub enum AdapterError {
    /// I/O error while reading or writing a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input is not valid JSON
    #[error("Invalid JSON format: {0}")]
    Json(#[from] serde_json::Error),

    /// Input is not valid CSV
    #[error("Invalid CSV format: {0}")]
    Csv(#[from] ::csv::Error),

    /// An entry could not be read as a record
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Store error while importing or exporting
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// File extension maps to no known format
    #[error("Unsupported record file format: {0}")]
    UnsupportedFormat(String),
}

/// Something that can produce a complete record collection
pub trait RecordSource {
    /// Load every record, in source order
    ///
    /// # Errors
    ///
    /// Returns `AdapterError` if the source cannot be read or holds malformed records.
    fn load_records(&self) -> Result<Vec<Record>, AdapterError>;

    /// Short human-readable description of the source
    fn describe(&self) -> String;
}

/// On-disk record file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    /// Pick a format from a file extension (`.json` or `.csv`, case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::UnsupportedFormat` for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, AdapterError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(AdapterError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A JSON or CSV record file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: RecordFormat,
}

impl FileSource {
    /// # Errors
    ///
    /// Returns `AdapterError::UnsupportedFormat` if the extension is not recognised.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, AdapterError> {
        let path = path.into();
        let format = RecordFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn format(&self) -> RecordFormat {
        self.format
    }

    /// Write `records` to this file in its format
    ///
    /// # Errors
    ///
    /// Returns `AdapterError` if serialization or writing fails.
    pub fn write_records(&self, records: &[Record]) -> Result<(), AdapterError> {
        match self.format {
            RecordFormat::Json => JsonAdapter::new().export_file(records, &self.path),
            RecordFormat::Csv => CsvAdapter::new().export_file(records, &self.path),
        }
    }
}

impl RecordSource for FileSource {
    fn load_records(&self) -> Result<Vec<Record>, AdapterError> {
        match self.format {
            RecordFormat::Json => JsonAdapter::new().import_file(&self.path),
            RecordFormat::Csv => CsvAdapter::new().import_file(&self.path),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

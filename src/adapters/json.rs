//! JSON record adapter
//!
//! Reads a JSON array of `{ "tags": [..], "payload": .. }` objects (legacy
//! `data`/`value` payload names accepted) and writes the same shape back,
//! pretty-printed.

use super::AdapterError;
use crate::engine::{Record, parse_records};
use serde_json::Value;
use std::fs;
use std::path::Path;

type Transform = Box<dyn Fn(Record) -> Record + Send + Sync>;

/// JSON import/export with optional per-record transform on import
#[derive(Default)]
pub struct JsonAdapter {
    transform: Option<Transform>,
}

impl JsonAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `transform` to every record after validation on import
    #[must_use]
    pub fn with_transform<F>(transform: F) -> Self
    where
        F: Fn(Record) -> Record + Send + Sync + 'static,
    {
        Self {
            transform: Some(Box::new(transform)),
        }
    }

    /// Parse records from JSON text
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::Json` for invalid JSON, or `AdapterError::Record`
    /// naming the first malformed entry.
    pub fn import_str(&self, source: &str) -> Result<Vec<Record>, AdapterError> {
        let value: Value = serde_json::from_str(source)?;
        self.import_value(&value)
    }

    /// Read records from an already-parsed JSON value
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::Record` naming the first malformed entry.
    pub fn import_value(&self, value: &Value) -> Result<Vec<Record>, AdapterError> {
        let records = parse_records(value)?;
        Ok(match &self.transform {
            Some(transform) => records.into_iter().map(|record| transform(record)).collect(),
            None => records,
        })
    }

    /// Read records from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::Io` if the file cannot be read, otherwise as
    /// [`JsonAdapter::import_str`].
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<Vec<Record>, AdapterError> {
        let content = fs::read_to_string(path.as_ref())?;
        let records = self.import_str(&content)?;
        tracing::debug!(path = %path.as_ref().display(), records = records.len(), "imported JSON records");
        Ok(records)
    }

    /// Serialize records as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::Json` if serialization fails.
    pub fn export_string(&self, records: &[Record]) -> Result<String, AdapterError> {
        Ok(serde_json::to_string_pretty(records)?)
    }

    /// Write records to a JSON file, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns `AdapterError` if serialization or writing fails.
    pub fn export_file(&self, records: &[Record], path: impl AsRef<Path>) -> Result<(), AdapterError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.export_string(records)?)?;
        tracing::debug!(path = %path.display(), records = records.len(), "exported JSON records");
        Ok(())
    }
}

//! CSV record adapter
//!
//! Two columns with a header row:
//!
//! ```text
//! tags,payload
//! pwd;project,"[""a"",""b""]"
//! pwd;personal,"{""user"":""bob""}"
//! ```
//!
//! `tags` is a `;`-separated list (empty segments dropped); `payload` is the
//! payload as JSON text.

use super::AdapterError;
use crate::engine::{Record, RecordError, parse_record};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

/// Separator between tags inside the `tags` column
pub const TAG_SEPARATOR: char = ';';

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    tags: String,
    payload: String,
}

/// CSV import/export
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvAdapter;

impl CsvAdapter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Read records from any reader
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::Csv` for unreadable rows, or `AdapterError::Record`
    /// naming the 0-based record index whose payload is not valid.
    pub fn import_reader<R: Read>(&self, reader: R) -> Result<Vec<Record>, AdapterError> {
        let mut rdr = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(::csv::Trim::Fields)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, row) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = row?;
            let tags: Vec<&str> = row
                .tags
                .split(TAG_SEPARATOR)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect();
            let payload: Value = serde_json::from_str(&row.payload)
                .map_err(|_| RecordError::malformed(index, "payload column is not valid JSON"))?;
            records.push(parse_record(index, &json!({ "tags": tags, "payload": payload }))?);
        }
        Ok(records)
    }

    /// Read records from a CSV file
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::Io` if the file cannot be opened, otherwise as
    /// [`CsvAdapter::import_reader`].
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<Vec<Record>, AdapterError> {
        let file = File::open(path.as_ref())?;
        let records = self.import_reader(file)?;
        tracing::debug!(path = %path.as_ref().display(), records = records.len(), "imported CSV records");
        Ok(records)
    }

    /// Write records to any writer, header included
    ///
    /// # Errors
    ///
    /// Returns `AdapterError` if serialization or writing fails.
    pub fn export_writer<W: Write>(&self, records: &[Record], writer: W) -> Result<(), AdapterError> {
        let mut wtr = ::csv::Writer::from_writer(writer);
        for record in records {
            wtr.serialize(CsvRow {
                tags: record.tags.join(&TAG_SEPARATOR.to_string()),
                payload: serde_json::to_string(&record.payload)?,
            })?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write records to a CSV file, creating parent directories
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
        self.export_writer(records, File::create(path)?)?;
        tracing::debug!(path = %path.display(), records = records.len(), "exported CSV records");
        Ok(())
    }
}

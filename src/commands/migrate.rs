//! Import and export - move record collections between files and a store

use crate::{
    TagnarrowError,
    adapters::{FileSource, ImportOptions, ImportReport, JsonAdapter, RecordSource, StoreAdapter},
    db::Database,
    output,
};
use std::path::Path;

type Result<T> = std::result::Result<T, TagnarrowError>;

/// Argument value that sends an export to stdout
pub const STDOUT: &str = "-";

/// Load a JSON or CSV file into the store
///
/// # Errors
/// Returns an error if the file cannot be read or holds malformed records,
/// or if store writes fail
pub fn import(db: &Database, file: &Path, options: &ImportOptions, quiet: bool) -> Result<ImportReport> {
    let source = FileSource::new(file)?;
    let records = source.load_records()?;
    tracing::info!(source = %source.describe(), records = records.len(), "importing records");

    let report = StoreAdapter::new(db).export_to_store(&records, options)?;
    db.flush()?;

    if !quiet {
        println!("Imported {} record(s) from {}", report.total, file.display());
        for record in &report.records {
            println!("{}", output::stored_record_line(record, false));
        }
    }
    Ok(report)
}

/// Write every stored record to `target` (`-` prints JSON to stdout)
///
/// # Errors
/// Returns an error if the store cannot be read or the file cannot be written
pub fn export(db: &Database, target: &str, quiet: bool) -> Result<usize> {
    let records = StoreAdapter::new(db).load_records()?;

    if target == STDOUT {
        println!("{}", JsonAdapter::new().export_string(&records)?);
        return Ok(records.len());
    }

    FileSource::new(target)?.write_records(&records)?;
    if !quiet {
        println!("Exported {} record(s) to {target}", records.len());
    }
    Ok(records.len())
}

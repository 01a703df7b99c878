//! Store adapter
//!
//! Bridges the sled store and the record shape: reading every stored record as
//! a [`Record`] (tag names plus payload), and writing a record collection into
//! the store, creating tags by name as needed.

use super::{AdapterError, RecordSource};
use crate::db::{Database, DbError, NewRecord, RecordFilter, RecordWithTags};
use crate::engine::Record;

/// Options for writing a collection into the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Delete every stored record first (tags are kept)
    pub clear_existing: bool,
    /// Prefix for generated record titles
    pub title_prefix: Option<String>,
}

/// Outcome of writing a collection into the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub records: Vec<RecordWithTags>,
    pub total: usize,
}

/// Reads and writes record collections through a [`Database`]
pub struct StoreAdapter<'a> {
    db: &'a Database,
}

impl<'a> StoreAdapter<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Convert one stored record into the record shape
    #[must_use]
    pub fn to_record(stored: &RecordWithTags) -> Record {
        Record {
            tags: stored.tag_names(),
            payload: stored.record.payload.clone(),
        }
    }

    /// Write `records` into the store
    ///
    /// Each record becomes one stored record linked to tags looked up (or
    /// created) by name. Every tag name is checked before the store is touched,
    /// so a rejected collection leaves existing records in place.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::Database` if a tag name is empty or any store
    /// operation fails; records written before a storage failure are kept.
    pub fn export_to_store(
        &self,
        records: &[Record],
        options: &ImportOptions,
    ) -> Result<ImportReport, AdapterError> {
        check_tag_names(records)?;

        if options.clear_existing {
            let existing = self.db.list_records(&RecordFilter::default())?;
            for record in &existing {
                self.db.delete_record(record.id)?;
            }
            tracing::info!(removed = existing.len(), "cleared existing records");
        }

        let mut created = Vec::with_capacity(records.len());
        for record in records {
            let tag_ids = record
                .tags
                .iter()
                .map(|name| self.db.get_or_create_tag(name).map(|tag| tag.id))
                .collect::<Result<Vec<_>, _>>()?;

            let stored = self.db.create_record(&NewRecord {
                title: generate_title(&record.tags, options.title_prefix.as_deref()),
                payload: record.payload.clone(),
                tag_ids,
            })?;

            let with_tags = self.db.get_record_with_tags(stored.id)?.ok_or_else(|| {
                crate::db::DbError::NotFound(format!("record {} after creation", stored.id))
            })?;
            created.push(with_tags);
        }

        tracing::info!(records = created.len(), "wrote records to store");
        Ok(ImportReport {
            total: created.len(),
            records: created,
        })
    }
}

impl RecordSource for StoreAdapter<'_> {
    fn load_records(&self) -> Result<Vec<Record>, AdapterError> {
        let stored = self.db.list_records_with_tags(&RecordFilter::default())?;
        Ok(stored.iter().map(Self::to_record).collect())
    }

    fn describe(&self) -> String {
        format!("store ({} records)", self.db.count())
    }
}

fn check_tag_names(records: &[Record]) -> Result<(), DbError> {
    for (index, record) in records.iter().enumerate() {
        if record.tags.iter().any(|name| name.trim().is_empty()) {
            return Err(DbError::InvalidInput(format!(
                "record at index {index}: tag name must not be empty"
            )));
        }
    }
    Ok(())
}

/// Title for a record written without one
///
/// With a prefix: `"<prefix> - <all tags>"`; otherwise `"Data: <first two tags>"`
/// followed by `...` when there are more.
#[must_use]
pub fn generate_title(tags: &[String], prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!("{prefix} - {}", tags.join(", ")),
        None => {
            let head = tags.iter().take(2).cloned().collect::<Vec<_>>().join(", ");
            let more = if tags.len() > 2 { "..." } else { "" };
            format!("Data: {head}{more}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewTag;
    use crate::engine::Payload;
    use crate::testing::{TestDb, sample_records};

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_generate_title() {
        assert_eq!(generate_title(&tags(&["a", "b"]), None), "Data: a, b");
        assert_eq!(generate_title(&tags(&["a", "b", "c"]), None), "Data: a, b...");
        assert_eq!(generate_title(&tags(&["a", "b", "c"]), Some("Migrated")), "Migrated - a, b, c");
        assert_eq!(generate_title(&[], None), "Data: ");
    }

    #[test]
    fn test_export_to_store_creates_tags_once() {
        let test_db = TestDb::new();
        let adapter = StoreAdapter::new(test_db.db());

        let report = adapter
            .export_to_store(&sample_records(), &ImportOptions::default())
            .unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(test_db.db().count(), 2);
        assert_eq!(test_db.db().tag_count(), 3);
        assert_eq!(report.records[0].record.title, "Data: pwd, project");
    }

    #[test]
    fn test_export_reuses_existing_tags() {
        let test_db = TestDb::new();
        let existing = test_db.db().create_tag(&NewTag::named("pwd")).unwrap();
        let adapter = StoreAdapter::new(test_db.db());

        let report = adapter
            .export_to_store(&sample_records(), &ImportOptions::default())
            .unwrap();
        assert!(report.records.iter().all(|r| r.tags.iter().any(|t| t.id == existing.id)));
    }

    #[test]
    fn test_clear_existing_replaces_records() {
        let test_db = TestDb::new();
        let adapter = StoreAdapter::new(test_db.db());
        adapter.export_to_store(&sample_records(), &ImportOptions::default()).unwrap();

        let options = ImportOptions {
            clear_existing: true,
            title_prefix: Some("Migrated".into()),
        };
        let one = vec![Record::new(tags(&["solo"]), Payload::List(vec![]))];
        adapter.export_to_store(&one, &options).unwrap();

        assert_eq!(test_db.db().count(), 1);
        let loaded = adapter.load_records().unwrap();
        assert_eq!(loaded, one);
    }

    #[test]
    fn test_load_records_sorted_tag_names() {
        let test_db = TestDb::new();
        let adapter = StoreAdapter::new(test_db.db());
        let record = Record::new(tags(&["zeta", "alpha"]), vec!["x".to_string()]);
        adapter.export_to_store(&[record], &ImportOptions::default()).unwrap();

        let loaded = adapter.load_records().unwrap();
        assert_eq!(loaded[0].tags, vec!["alpha", "zeta"]);
        assert!(adapter.describe().contains("1 records"));
    }

    #[test]
    fn test_empty_tag_name_fails() {
        let test_db = TestDb::new();
        let adapter = StoreAdapter::new(test_db.db());
        let record = Record::new(tags(&[""]), vec!["x".to_string()]);
        let result = adapter.export_to_store(&[record], &ImportOptions::default());
        assert!(matches!(result, Err(AdapterError::Database(_))));
        assert_eq!(test_db.db().tag_count(), 0);
    }

    #[test]
    fn test_rejected_clear_keeps_existing_records() {
        let test_db = TestDb::new();
        let adapter = StoreAdapter::new(test_db.db());
        adapter.export_to_store(&sample_records(), &ImportOptions::default()).unwrap();

        let incoming = vec![
            Record::new(tags(&["ok"]), vec!["1".to_string()]),
            Record::new(tags(&[" "]), vec!["2".to_string()]),
        ];
        let options = ImportOptions {
            clear_existing: true,
            title_prefix: None,
        };
        let err = adapter.export_to_store(&incoming, &options).unwrap_err();

        assert!(err.to_string().contains("index 1"));
        assert_eq!(adapter.load_records().unwrap().len(), 2);
        assert!(test_db.db().get_tag_by_name("ok").unwrap().is_none());
    }
}

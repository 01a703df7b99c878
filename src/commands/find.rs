//! Find command - stored records carrying all of the given tags

use super::existing_tag_ids;
use crate::{
    TagnarrowError,
    db::{Database, RecordWithTags},
    output,
};

type Result<T> = std::result::Result<T, TagnarrowError>;

/// Execute the find command
///
/// # Errors
/// Returns an error if database operations fail
pub fn execute(db: &Database, tags: &[String], quiet: bool) -> Result<()> {
    let records = find_all(db, tags)?;

    if records.is_empty() {
        if !quiet {
            println!("No records carry all of: {}", output::tag_list(tags));
        }
        return Ok(());
    }

    if !quiet {
        println!("Found {} record(s):", records.len());
    }
    for record in &records {
        println!("{}", output::stored_record_line(record, quiet));
    }
    Ok(())
}

/// Records carrying every tag in `tags`; an unknown tag matches nothing
///
/// # Errors
/// Returns an error if database operations fail
pub fn find_all(db: &Database, tags: &[String]) -> Result<Vec<RecordWithTags>> {
    match existing_tag_ids(db, tags)? {
        Some(ids) => Ok(db.find_records_by_all_tags(&ids)?),
        None => {
            tracing::debug!(?tags, "unknown tag in lookup");
            Ok(Vec::new())
        }
    }
}

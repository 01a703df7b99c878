//! Record command - create, inspect and edit stored records

use super::{ensure_tag_ids, parse_payload};
use crate::{
    TagnarrowError,
    cli::RecordCommands,
    db::{Database, NewRecord, RecordFilter, RecordId, RecordUpdate, RecordWithTags},
    output,
};

type Result<T> = std::result::Result<T, TagnarrowError>;

/// Execute a record management command
///
/// # Errors
/// Returns an error if input is invalid or database operations fail
pub fn execute(db: &Database, command: &RecordCommands, quiet: bool) -> Result<()> {
    match command {
        RecordCommands::Add { title, tags, payload } => {
            let record = add_record(db, title, tags, payload)?;
            if quiet {
                println!("{}", record.record.id);
            } else {
                println!("Created record:");
                println!("{}", output::stored_record_line(&record, false));
            }
        }
        RecordCommands::List { tags, title } => list_records(db, tags, title.clone(), quiet)?,
        RecordCommands::Show { id } => {
            let record = require(db, *id)?;
            println!("{}", output::stored_record_detail(&record));
        }
        RecordCommands::Update { id, title, payload } => {
            let payload = payload.as_deref().map(parse_payload).transpose()?;
            db.update_record(
                *id,
                &RecordUpdate {
                    title: title.clone(),
                    payload,
                },
            )?;
            if !quiet {
                println!("{}", output::stored_record_line(&require(db, *id)?, false));
            }
        }
        RecordCommands::Remove { id } => {
            if !db.delete_record(*id)? {
                return Err(TagnarrowError::InvalidInput(format!("Record #{id} not found")));
            }
            if !quiet {
                println!("Deleted record #{id}");
            }
        }
        RecordCommands::Tag { id, tags } => {
            let tag_ids = ensure_tag_ids(db, tags)?;
            db.add_tags_to_record(*id, &tag_ids)?;
            if !quiet {
                println!("{}", output::stored_record_line(&require(db, *id)?, false));
            }
        }
        RecordCommands::Untag { id, tags } => {
            let record = require(db, *id)?;
            let tag_ids: Vec<_> = record
                .tags
                .iter()
                .filter(|tag| tags.contains(&tag.name))
                .map(|tag| tag.id)
                .collect();
            db.remove_tags_from_record(*id, &tag_ids)?;
            if !quiet {
                println!("{}", output::stored_record_line(&require(db, *id)?, false));
            }
        }
    }
    Ok(())
}

/// Create a record from CLI text, creating its tags as needed
///
/// # Errors
/// Returns an error if the payload is not valid or the record cannot be stored
pub fn add_record(db: &Database, title: &str, tags: &[String], payload: &str) -> Result<RecordWithTags> {
    let payload = parse_payload(payload)?;
    let tag_ids = ensure_tag_ids(db, tags)?;
    let record = db.create_record(&NewRecord {
        title: title.to_string(),
        payload,
        tag_ids,
    })?;
    require(db, record.id)
}

fn list_records(db: &Database, tags: &[String], title: Option<String>, quiet: bool) -> Result<()> {
    let tag_ids = if tags.is_empty() {
        Vec::new()
    } else {
        let known: Vec<_> = tags
            .iter()
            .filter_map(|name| db.get_tag_by_name(name).transpose())
            .map(|tag| tag.map(|t| t.id))
            .collect::<std::result::Result<_, _>>()?;
        if known.is_empty() {
            if !quiet {
                println!("No records found.");
            }
            return Ok(());
        }
        known
    };

    let records = db.list_records_with_tags(&RecordFilter { tag_ids, title })?;
    if records.is_empty() {
        if !quiet {
            println!("No records found.");
        }
        return Ok(());
    }

    if !quiet {
        println!("Records ({}):", records.len());
    }
    for record in &records {
        println!("{}", output::stored_record_line(record, quiet));
    }
    Ok(())
}

fn require(db: &Database, id: RecordId) -> Result<RecordWithTags> {
    db.get_record_with_tags(id)?
        .ok_or_else(|| TagnarrowError::InvalidInput(format!("Record #{id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::existing_tag_ids;
    use crate::engine::Payload;
    use crate::testing::TestDb;

    #[test]
    fn test_add_record_creates_tags() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let record = add_record(db, "Bank", &["pwd".into(), "bank".into()], r#"["123"]"#).unwrap();

        assert_eq!(record.tag_names(), vec!["bank", "pwd"]);
        assert_eq!(record.record.payload, Payload::List(vec!["123".into()]));
        assert!(existing_tag_ids(db, &["pwd".into()]).unwrap().is_some());
    }

    #[test]
    fn test_add_record_rejects_bad_payload() {
        let test_db = TestDb::new();
        let result = add_record(test_db.db(), "Bad", &[], "[1, 2]");
        assert!(matches!(result, Err(TagnarrowError::InvalidInput(_))));
        assert_eq!(test_db.db().count(), 0);
    }

    #[test]
    fn test_tag_and_untag() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let id = add_record(db, "Mail", &["pwd".into()], "[]").unwrap().record.id;

        execute(db, &RecordCommands::Tag { id, tags: vec!["mail".into()] }, true).unwrap();
        assert_eq!(require(db, id).unwrap().tag_names(), vec!["mail", "pwd"]);

        execute(db, &RecordCommands::Untag { id, tags: vec!["pwd".into(), "other".into()] }, true).unwrap();
        assert_eq!(require(db, id).unwrap().tag_names(), vec!["mail"]);
    }

    #[test]
    fn test_update_and_remove() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let id = add_record(db, "Old", &[], "[]").unwrap().record.id;

        execute(
            db,
            &RecordCommands::Update {
                id,
                title: Some("New".into()),
                payload: Some(r#"{"user":"bob"}"#.into()),
            },
            true,
        )
        .unwrap();
        let record = require(db, id).unwrap();
        assert_eq!(record.record.title, "New");
        assert!(matches!(record.record.payload, Payload::Map(_)));

        execute(db, &RecordCommands::Remove { id }, true).unwrap();
        assert!(execute(db, &RecordCommands::Remove { id }, true).is_err());
        assert!(execute(db, &RecordCommands::Show { id }, true).is_err());
    }

    #[test]
    fn test_list_with_unknown_tag_prints_nothing() {
        let test_db = TestDb::new();
        add_record(test_db.db(), "A", &["x".into()], "[]").unwrap();
        let command = RecordCommands::List {
            tags: vec!["missing".into()],
            title: None,
        };
        execute(test_db.db(), &command, true).unwrap();
    }
}

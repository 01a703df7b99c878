//! Tags command - global tag management

use super::confirm;
use crate::{
    TagnarrowError,
    cli::TagsCommands,
    db::{Database, NewTag, Tag, TagUpdate},
    output,
};

type Result<T> = std::result::Result<T, TagnarrowError>;

/// Execute the tags management command
///
/// # Errors
/// Returns an error if database operations fail or user interaction fails
pub fn execute(db: &Database, command: &TagsCommands, quiet: bool) -> Result<()> {
    match command {
        TagsCommands::List { pattern } => list_tags(db, pattern.as_deref(), quiet),
        TagsCommands::Add { name, color } => {
            let tag = db.create_tag(&NewTag {
                name: name.clone(),
                color: color.clone(),
            })?;
            if !quiet {
                println!("Created tag '{}'", tag.name);
            }
            Ok(())
        }
        TagsCommands::Rename { old, new } => {
            let tag = require(db, old)?;
            db.update_tag(
                tag.id,
                &TagUpdate {
                    name: Some(new.clone()),
                    color: None,
                },
            )?;
            if !quiet {
                println!("Renamed tag '{old}' to '{new}'");
            }
            Ok(())
        }
        TagsCommands::Remove { tag } => remove_tag(db, tag, quiet),
    }
}

fn list_tags(db: &Database, pattern: Option<&str>, quiet: bool) -> Result<()> {
    let tags = match pattern {
        Some(pattern) => db.find_tags_by_regex(pattern)?,
        None => db.list_tags()?,
    };

    if tags.is_empty() {
        if !quiet {
            println!("No tags found in database.");
        }
        return Ok(());
    }

    if !quiet {
        println!("Tags in database:");
    }
    for tag in &tags {
        let count = db.records_for_tag(tag.id)?.len();
        println!("{}", output::tag_with_count(tag, count, quiet));
    }
    Ok(())
}

fn remove_tag(db: &Database, name: &str, quiet: bool) -> Result<()> {
    let tag = require(db, name)?;
    let records = db.records_for_tag(tag.id)?;

    if !quiet && !records.is_empty() {
        println!("Tag '{name}' is used by {} record(s):", records.len());
        for record in &records {
            println!("  - #{} {}", record.id, record.title);
        }
        println!();
    }

    if !confirm("Remove tag from all records?", quiet)? {
        if !quiet {
            println!("Cancelled.");
        }
        return Ok(());
    }

    db.delete_tag(tag.id)?;
    if !quiet {
        println!("Removed tag '{name}' from {} record(s).", records.len());
    }
    Ok(())
}

fn require(db: &Database, name: &str) -> Result<Tag> {
    db.get_tag_by_name(name)?
        .ok_or_else(|| TagnarrowError::InvalidInput(format!("Tag '{name}' not found")))
}

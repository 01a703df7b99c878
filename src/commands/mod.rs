//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI args
//! and runs the operation against the store, a record file, or the config.

pub mod config;
pub mod db;
pub mod find;
pub mod migrate;
pub mod record;
pub mod session;
pub mod tags;

pub use self::config::execute as config;
pub use db::execute as db;
pub use find::execute as find;
pub use record::execute as record;
pub use session::execute as session;
pub use tags::execute as tags;

use crate::TagnarrowError;
use crate::db::{Database, TagId};
use crate::engine::Payload;
use dialoguer::Confirm;

type Result<T> = std::result::Result<T, TagnarrowError>;

/// Parse a payload given on the command line as JSON
///
/// # Errors
///
/// Returns `TagnarrowError::InvalidInput` unless the text is a JSON list of
/// strings or a JSON object of strings.
pub fn parse_payload(text: &str) -> Result<Payload> {
    serde_json::from_str(text).map_err(|_| {
        TagnarrowError::InvalidInput(format!(
            "payload must be a JSON list of strings or an object of strings, got: {text}"
        ))
    })
}

/// Resolve tag names to ids, creating missing tags
fn ensure_tag_ids(db: &Database, names: &[String]) -> Result<Vec<TagId>> {
    names
        .iter()
        .map(|name| Ok(db.get_or_create_tag(name)?.id))
        .collect()
}

/// Resolve tag names to ids; `None` if any name is unknown
fn existing_tag_ids(db: &Database, names: &[String]) -> Result<Option<Vec<TagId>>> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        match db.get_tag_by_name(name)? {
            Some(tag) => ids.push(tag.id),
            None => return Ok(None),
        }
    }
    Ok(Some(ids))
}

/// Ask for confirmation; quiet mode confirms without prompting
fn confirm(prompt: &str, quiet: bool) -> Result<bool> {
    if quiet {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| TagnarrowError::InvalidInput(format!("Confirmation failed: {e}")))
}

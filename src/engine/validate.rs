//! Reading untyped JSON into records
//!
//! Checks each entry by hand so the error can name the offending index and
//! what is wrong with it, rather than surfacing a generic serde message.

use super::error::RecordError;
use super::types::{Payload, Record};
use serde_json::Value;

/// Field names accepted for the payload, in lookup order
const PAYLOAD_FIELDS: [&str; 3] = ["payload", "data", "value"];

/// Read a JSON array into records
///
/// # Errors
///
/// Returns `RecordError::NotAnArray` if `value` is not an array, or
/// `RecordError::Malformed` naming the first entry that lacks a `tags` array of
/// strings or a list/map payload.
pub fn parse_records(value: &Value) -> Result<Vec<Record>, RecordError> {
    let entries = value.as_array().ok_or(RecordError::NotAnArray)?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_record(index, entry))
        .collect()
}

/// Read one entry of a collection
///
/// # Errors
///
/// Returns `RecordError::Malformed` carrying `index` when the entry is not a
/// record.
pub fn parse_record(index: usize, entry: &Value) -> Result<Record, RecordError> {
    let object = entry
        .as_object()
        .ok_or_else(|| RecordError::malformed(index, "entry is not an object"))?;

    let tags = object
        .get("tags")
        .and_then(Value::as_array)
        .ok_or_else(|| RecordError::malformed(index, "missing valid 'tags' array"))?
        .iter()
        .map(|tag| {
            tag.as_str()
                .map(String::from)
                .ok_or_else(|| RecordError::malformed(index, "'tags' must contain only strings"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let raw_payload = PAYLOAD_FIELDS
        .iter()
        .find_map(|field| object.get(*field).filter(|v| !v.is_null()))
        .ok_or_else(|| RecordError::malformed(index, "missing 'payload' field"))?;

    let payload: Payload = serde_json::from_value(raw_payload.clone()).map_err(|_| {
        RecordError::malformed(
            index,
            "'payload' must be a list of strings or a map of strings",
        )
    })?;

    Ok(Record { tags, payload })
}

//! Stored row types and key wrappers
//!
//! Public types (`Tag`, `StoredRecord`, request structs) are what callers see.
//! The `*Row` types are the bincode-encoded values kept in sled; record payloads
//! are stored as JSON text next to their `PayloadKind`.
//!
//! Keys are big-endian `u64` ids wrapped in [`IdKey`] so that tree iteration
//! follows creation order.

use super::error::DbError;
use crate::engine::{Payload, PayloadKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a stored record
pub type RecordId = u64;

/// Identifier of a stored tag
pub type TagId = u64;

/// Wrapper for an id that can be converted to and from a sled key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IdKey(pub u64);

impl IdKey {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// # Errors
    ///
    /// Returns `DbError` if `bytes` is not exactly eight bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DbError> {
        let array: [u8; 8] = bytes
            .try_into()
            .map_err(|_| DbError::SerializeError(format!("Invalid key length {}", bytes.len())))?;
        Ok(Self(u64::from_be_bytes(array)))
    }

    #[must_use]
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl From<u64> for IdKey {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl TryFrom<&[u8]> for IdKey {
    type Error = DbError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

/// A tag as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to create a tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub color: Option<String>,
}

impl NewTag {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }
}

/// Partial tag update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// A record as stored in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub title: String,
    pub kind: PayloadKind,
    pub payload: Payload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored record together with its tags, sorted by tag name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordWithTags {
    pub record: StoredRecord,
    pub tags: Vec<Tag>,
}

impl RecordWithTags {
    /// Tag names in display order
    #[must_use]
    pub fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.name.clone()).collect()
    }
}

/// Request to create a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub title: String,
    pub payload: Payload,
    pub tag_ids: Vec<TagId>,
}

/// Partial record update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    pub title: Option<String>,
    pub payload: Option<Payload>,
}

/// Listing filter
///
/// `tag_ids` keeps records carrying ANY of the given tags; `title` is a
/// case-sensitive substring match. Empty filters keep everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub tag_ids: Vec<TagId>,
    pub title: Option<String>,
}

/// Encoded value of the `records` tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RecordRow {
    pub title: String,
    pub kind: PayloadKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordRow {
    pub(crate) fn into_record(self, id: RecordId) -> Result<StoredRecord, DbError> {
        let payload: Payload = serde_json::from_str(&self.content)?;
        Ok(StoredRecord {
            id,
            title: self.title,
            kind: self.kind,
            payload,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Encoded value of the `tags` tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TagRow {
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TagRow {
    pub(crate) fn into_tag(self, id: TagId) -> Tag {
        Tag {
            id,
            name: self.name,
            color: self.color,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;

//! Record and selection state types
//!
//! These are the shapes that cross the engine boundary. They serialize to the
//! JSON layout used by record files and session snapshots:
//!
//! ```text
//! Record:          { "tags": [..], "payload": [..] | { .. } }
//! SelectionState:  { "recordCollection": [..], "selectedTags": [..],
//!                    "matchedRecords": [..], "remainingTags": [..] }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value carried by a record, opaque to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// Ordered list of strings
    List(Vec<String>),
    /// String key to string value mapping
    Map(BTreeMap<String, String>),
}

impl Payload {
    /// Storage discriminator for this payload
    #[must_use]
    pub const fn kind(&self) -> PayloadKind {
        match self {
            Self::List(_) => PayloadKind::Array,
            Self::Map(_) => PayloadKind::Object,
        }
    }

    /// Number of entries in the payload
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            Self::Map(fields) => fields.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Display lines, one per entry (`value` or `key: value`)
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            Self::Map(fields) => fields.iter().map(|(k, v)| format!("{k}: {v}")).collect(),
        }
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl From<Vec<String>> for Payload {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, String>> for Payload {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self::Map(fields)
    }
}

/// Payload shape tag, persisted next to the payload text in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Array,
    Object,
}

impl std::fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Array => write!(f, "array"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// One tagged unit of data subject to filtering
///
/// `data` and `value` are accepted as legacy names for `payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub tags: Vec<String>,
    #[serde(alias = "data", alias = "value")]
    pub payload: Payload,
}

impl Record {
    #[must_use]
    pub fn new(tags: Vec<String>, payload: impl Into<Payload>) -> Self {
        Self {
            tags,
            payload: payload.into(),
        }
    }

    /// True when every selected tag appears in this record's tags
    ///
    /// Exact, case-sensitive comparison. An empty selection matches every record.
    #[must_use]
    pub fn matches<S: AsRef<str>>(&self, selected: &[S]) -> bool {
        selected
            .iter()
            .all(|tag| self.tags.iter().any(|own| own == tag.as_ref()))
    }
}

/// Full state of a selection session
///
/// `matched_records` and `remaining_tags` are derived from the other two fields
/// and are recomputed by the engine; values read from a snapshot are ignored.
///
/// `record_collection` is `None` only for a snapshot that omits the key. An
/// explicitly empty collection is still a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_collection: Option<Vec<Record>>,
    #[serde(default)]
    pub selected_tags: Vec<String>,
    #[serde(default)]
    pub matched_records: Vec<Record>,
    #[serde(default)]
    pub remaining_tags: Vec<String>,
}

impl SelectionState {
    /// Fresh state over `records` with nothing selected and no derived result yet
    #[must_use]
    pub const fn new(records: Vec<Record>) -> Self {
        Self {
            record_collection: Some(records),
            selected_tags: Vec::new(),
            matched_records: Vec::new(),
            remaining_tags: Vec::new(),
        }
    }

    /// The record collection, empty when none was given
    #[must_use]
    pub fn records(&self) -> &[Record] {
        self.record_collection.as_deref().unwrap_or_default()
    }

    /// Derived half of the state
    #[must_use]
    pub fn derived(&self) -> DerivedResult {
        DerivedResult {
            matched_records: self.matched_records.clone(),
            remaining_tags: self.remaining_tags.clone(),
        }
    }

    /// Whether no further narrowing is possible
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining_tags.is_empty()
    }
}

/// Result of one recomputation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedResult {
    pub matched_records: Vec<Record>,
    pub remaining_tags: Vec<String>,
}

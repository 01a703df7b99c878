//! Tag-selection engine
//!
//! Holds a fixed record collection and the tags selected so far. Every mutation
//! rescans the whole collection and stores two derived values back into the
//! state:
//!
//! - **matched records**: records whose tags are a superset of the selection,
//!   in collection order
//! - **remaining tags**: distinct tags across the matched records, minus the
//!   selection, in first-seen order
//!
//! ```
//! use tagnarrow::engine::{Engine, Record};
//!
//! let records = vec![
//!     Record::new(vec!["pwd".into(), "project".into()], vec!["a".to_string()]),
//!     Record::new(vec!["pwd".into(), "personal".into()], vec!["b".to_string()]),
//! ];
//! let mut engine = Engine::initialize(records, None);
//!
//! let state = engine.select_tag("project");
//! assert_eq!(state.matched_records.len(), 1);
//! assert_eq!(state.remaining_tags, vec!["pwd"]);
//! ```
//!
//! The engine performs no I/O. Persisting a session is the caller's job; see
//! [`crate::session`].

pub mod error;
pub mod types;
pub mod validate;

pub use error::RecordError;
pub use types::{DerivedResult, Payload, PayloadKind, Record, SelectionState};
pub use validate::{parse_record, parse_records};

use serde_json::Value;
use std::collections::HashSet;

/// Compute matched records and remaining tags for a selection
///
/// Pure function of its inputs; the engine calls it after every mutation.
#[must_use]
pub fn derive<S: AsRef<str>>(records: &[Record], selected: &[S]) -> DerivedResult {
    let matched_records: Vec<Record> = records
        .iter()
        .filter(|record| record.matches(selected))
        .cloned()
        .collect();

    let selected_set: HashSet<&str> = selected.iter().map(|tag| tag.as_ref()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut remaining_tags = Vec::new();

    for tag in matched_records.iter().flat_map(|record| record.tags.iter()) {
        if !selected_set.contains(tag.as_str()) && seen.insert(tag.as_str()) {
            remaining_tags.push(tag.clone());
        }
    }

    DerivedResult {
        matched_records,
        remaining_tags,
    }
}

/// A selection session over one record collection
///
/// Operations mutate the owned state and hand back a borrow of it. Use
/// [`Engine::snapshot`] for an owned copy.
#[derive(Debug, Clone)]
pub struct Engine {
    state: SelectionState,
}

impl Engine {
    /// Build an engine, optionally resuming from a prior state
    ///
    /// A prior state's own record collection wins over `records`, so a resumed
    /// session filters the data it was built against, even when that data is
    /// empty. Only a prior state with no collection at all falls back to
    /// `records`. Derived fields of the prior state are discarded and recomputed.
    #[must_use]
    pub fn initialize(records: Vec<Record>, prior: Option<SelectionState>) -> Self {
        let state = match prior {
            Some(mut prior) => {
                prior.record_collection.get_or_insert(records);
                tracing::debug!(
                    records = prior.records().len(),
                    selected = prior.selected_tags.len(),
                    "resuming selection state"
                );
                prior
            }
            None => SelectionState::new(records),
        };

        let mut engine = Self { state };
        engine.refresh();
        engine
    }

    /// Build an engine from an untyped JSON collection
    ///
    /// # Errors
    ///
    /// Returns `RecordError` naming the first entry that is not a record.
    pub fn try_from_value(records: &Value, prior: Option<SelectionState>) -> Result<Self, RecordError> {
        let records = parse_records(records)?;
        Ok(Self::initialize(records, prior))
    }

    /// Add `tag` to the selection and recompute
    ///
    /// Selecting a tag that is already selected leaves the selection unchanged.
    pub fn select_tag(&mut self, tag: impl Into<String>) -> &SelectionState {
        let tag = tag.into();
        if !self.state.selected_tags.contains(&tag) {
            self.state.selected_tags.push(tag);
        }
        self.refresh();
        &self.state
    }

    /// Drop every selected tag that appears in `tags` and recompute
    ///
    /// Tags that are not selected are ignored.
    pub fn remove_tags<S: AsRef<str>>(&mut self, tags: &[S]) -> &SelectionState {
        self.state
            .selected_tags
            .retain(|selected| !tags.iter().any(|t| t.as_ref() == selected));
        self.refresh();
        &self.state
    }

    /// Replace the selection wholesale and recompute
    ///
    /// The list is stored as given, duplicates and unknown tags included.
    pub fn override_selected_tags(&mut self, tags: Vec<String>) -> &SelectionState {
        self.state.selected_tags = tags;
        self.refresh();
        &self.state
    }

    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    #[must_use]
    pub fn selected_tags(&self) -> &[String] {
        &self.state.selected_tags
    }

    #[must_use]
    pub fn matched_records(&self) -> &[Record] {
        &self.state.matched_records
    }

    #[must_use]
    pub fn remaining_tags(&self) -> &[String] {
        &self.state.remaining_tags
    }

    /// Owned copy of the current state
    #[must_use]
    pub fn snapshot(&self) -> SelectionState {
        self.state.clone()
    }

    #[must_use]
    pub fn into_state(self) -> SelectionState {
        self.state
    }

    fn refresh(&mut self) {
        let DerivedResult {
            matched_records,
            remaining_tags,
        } = derive(self.state.records(), &self.state.selected_tags);

        tracing::debug!(
            selected = ?self.state.selected_tags,
            matched = matched_records.len(),
            remaining = remaining_tags.len(),
            "recomputed selection"
        );

        self.state.matched_records = matched_records;
        self.state.remaining_tags = remaining_tags;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_records() -> Vec<Record> {
        vec![
            Record::new(
                vec!["pwd".into(), "project".into()],
                vec!["a".to_string(), "b".to_string()],
            ),
            Record::new(
                vec!["pwd".into(), "personal".into()],
                vec!["a".to_string(), "b".to_string()],
            ),
        ]
    }

    fn wider_records() -> Vec<Record> {
        vec![
            Record::new(vec!["a".into(), "b".into(), "c".into()], vec!["1".to_string()]),
            Record::new(vec!["a".into(), "c".into()], vec!["2".to_string()]),
            Record::new(vec!["b".into(), "d".into()], vec!["3".to_string()]),
            Record::new(vec!["c".into(), "d".into(), "a".into()], vec!["4".to_string()]),
        ]
    }

    #[test]
    fn test_initial_state_lists_every_tag() {
        let engine = Engine::initialize(sample_records(), None);
        let state = engine.state();
        assert!(state.selected_tags.is_empty());
        assert_eq!(state.matched_records, sample_records());
        assert_eq!(state.remaining_tags, vec!["pwd", "project", "personal"]);
    }

    #[test]
    fn test_select_shared_tag_keeps_both_records() {
        let mut engine = Engine::initialize(sample_records(), None);
        let state = engine.select_tag("pwd");
        assert_eq!(state.matched_records, sample_records());
        assert_eq!(state.remaining_tags, vec!["project", "personal"]);
    }

    #[test]
    fn test_select_second_tag_narrows_to_one() {
        let mut engine = Engine::initialize(sample_records(), None);
        engine.select_tag("pwd");
        let state = engine.select_tag("project");
        assert_eq!(state.matched_records, vec![sample_records()[0].clone()]);
        assert!(state.remaining_tags.is_empty());
        assert!(state.is_exhausted());
    }

    #[test]
    fn test_resume_from_snapshot_matches_fresh_run() {
        let mut fresh = Engine::initialize(sample_records(), None);
        let after_pwd = fresh.select_tag("pwd").clone();
        let expected = fresh.select_tag("project").clone();

        let mut resumed = Engine::initialize(Vec::new(), Some(after_pwd));
        let state = resumed.select_tag("project");
        assert_eq!(state, &expected);
        assert_eq!(state.selected_tags, vec!["pwd", "project"]);
    }

    #[test]
    fn test_resume_from_serialized_snapshot() {
        let mut fresh = Engine::initialize(sample_records(), None);
        fresh.select_tag("pwd");
        let json = serde_json::to_string(fresh.state()).unwrap();

        let prior: SelectionState = serde_json::from_str(&json).unwrap();
        let mut resumed = Engine::initialize(Vec::new(), Some(prior));
        let state = resumed.select_tag("project");
        assert_eq!(state.matched_records.len(), 1);
        assert!(state.remaining_tags.is_empty());
    }

    #[test]
    fn test_prior_collection_takes_precedence() {
        let prior = SelectionState::new(vec![Record::new(
            vec!["only".into()],
            vec!["x".to_string()],
        )]);
        let engine = Engine::initialize(sample_records(), Some(prior));
        assert_eq!(engine.state().records().len(), 1);
        assert_eq!(engine.remaining_tags(), ["only"]);
    }

    #[test]
    fn test_prior_without_collection_uses_argument() {
        let prior = SelectionState {
            selected_tags: vec!["personal".into()],
            ..SelectionState::default()
        };
        let engine = Engine::initialize(sample_records(), Some(prior));
        assert_eq!(engine.matched_records().len(), 1);
        assert_eq!(engine.remaining_tags(), ["pwd"]);
    }

    #[test]
    fn test_prior_with_empty_collection_resumes_empty() {
        let prior: SelectionState =
            serde_json::from_value(json!({"recordCollection": [], "selectedTags": []})).unwrap();
        let engine = Engine::initialize(sample_records(), Some(prior));
        assert!(engine.state().records().is_empty());
        assert!(engine.matched_records().is_empty());
        assert!(engine.remaining_tags().is_empty());
    }

    #[test]
    fn test_stale_derived_fields_are_recomputed() {
        let prior = SelectionState {
            record_collection: Some(sample_records()),
            selected_tags: vec!["project".into()],
            matched_records: Vec::new(),
            remaining_tags: vec!["bogus".into()],
        };
        let engine = Engine::initialize(Vec::new(), Some(prior));
        assert_eq!(engine.matched_records().len(), 1);
        assert_eq!(engine.remaining_tags(), ["pwd"]);
    }

    #[test]
    fn test_empty_collection() {
        let mut engine = Engine::initialize(Vec::new(), None);
        assert!(engine.matched_records().is_empty());
        assert!(engine.remaining_tags().is_empty());

        let state = engine.select_tag("anything");
        assert!(state.matched_records.is_empty());
        assert!(state.remaining_tags.is_empty());
    }

    #[test]
    fn test_select_unknown_tag_yields_nothing() {
        let mut engine = Engine::initialize(sample_records(), None);
        let state = engine.select_tag("missing");
        assert!(state.matched_records.is_empty());
        assert!(state.remaining_tags.is_empty());
    }

    #[test]
    fn test_select_is_case_sensitive() {
        let mut engine = Engine::initialize(sample_records(), None);
        assert!(engine.select_tag("PWD").matched_records.is_empty());
    }

    #[test]
    fn test_reselect_does_not_duplicate() {
        let mut engine = Engine::initialize(sample_records(), None);
        engine.select_tag("pwd");
        let state = engine.select_tag("pwd");
        assert_eq!(state.selected_tags, vec!["pwd"]);
    }

    #[test]
    fn test_remove_empty_is_noop() {
        let mut engine = Engine::initialize(sample_records(), None);
        let before = engine.select_tag("x").clone();
        let after = engine.remove_tags::<String>(&[]);
        assert_eq!(&before, after);
    }

    #[test]
    fn test_remove_tags_preserves_order() {
        let mut engine = Engine::initialize(wider_records(), None);
        engine.override_selected_tags(vec!["a".into(), "b".into(), "c".into()]);
        let state = engine.remove_tags(&["b", "zzz"]);
        assert_eq!(state.selected_tags, vec!["a", "c"]);
        assert_eq!(state.matched_records.len(), 3);
        assert_eq!(state.remaining_tags, vec!["b", "d"]);
    }

    #[test]
    fn test_remove_all_restores_initial_result() {
        let mut engine = Engine::initialize(sample_records(), None);
        let initial = engine.state().derived();
        engine.select_tag("pwd");
        engine.select_tag("personal");
        let state = engine.remove_tags(&["pwd", "personal"]);
        assert_eq!(state.derived(), initial);
    }

    #[test]
    fn test_override_keeps_duplicates_verbatim() {
        let mut engine = Engine::initialize(sample_records(), None);
        let state = engine.override_selected_tags(vec!["pwd".into(), "pwd".into()]);
        assert_eq!(state.selected_tags, vec!["pwd", "pwd"]);
        assert_eq!(state.matched_records.len(), 2);
        assert_eq!(state.remaining_tags, vec!["project", "personal"]);
    }

    #[test]
    fn test_override_with_current_selection_is_stable() {
        let mut engine = Engine::initialize(wider_records(), None);
        engine.select_tag("c");
        engine.select_tag("a");
        let before = engine.state().derived();
        let selected = engine.selected_tags().to_vec();
        let state = engine.override_selected_tags(selected);
        assert_eq!(state.derived(), before);
    }

    #[test]
    fn test_override_unsatisfiable_combination() {
        let mut engine = Engine::initialize(sample_records(), None);
        let state = engine.override_selected_tags(vec!["project".into(), "personal".into()]);
        assert!(state.matched_records.is_empty());
        assert!(state.remaining_tags.is_empty());
    }

    #[test]
    fn test_selection_narrows_monotonically() {
        let mut engine = Engine::initialize(wider_records(), None);
        let mut previous = engine.matched_records().len();
        for tag in ["a", "c", "b", "d"] {
            let current = engine.select_tag(tag).matched_records.len();
            assert!(current <= previous, "selecting {tag} widened the match");
            previous = current;
        }
    }

    #[test]
    fn test_remaining_never_overlaps_selection() {
        let mut engine = Engine::initialize(wider_records(), None);
        let steps: Vec<Box<dyn Fn(&mut Engine)>> = vec![
            Box::new(|e| {
                e.select_tag("a");
            }),
            Box::new(|e| {
                e.select_tag("c");
            }),
            Box::new(|e| {
                e.remove_tags(&["a"]);
            }),
            Box::new(|e| {
                e.override_selected_tags(vec!["d".into(), "d".into()]);
            }),
        ];
        for step in steps {
            step(&mut engine);
            let state = engine.state();
            for tag in &state.remaining_tags {
                assert!(!state.selected_tags.contains(tag));
            }
        }
    }

    #[test]
    fn test_matched_records_keep_collection_order() {
        let mut engine = Engine::initialize(wider_records(), None);
        let state = engine.select_tag("a");
        let payloads: Vec<_> = state.matched_records.iter().map(|r| r.payload.lines()).collect();
        assert_eq!(payloads, vec![vec!["1"], vec!["2"], vec!["4"]]);
        assert_eq!(state.remaining_tags, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_record_tags_untouched() {
        let records = wider_records();
        let mut engine = Engine::initialize(records.clone(), None);
        engine.select_tag("a");
        engine.override_selected_tags(vec!["b".into()]);
        assert_eq!(engine.state().records(), records.as_slice());
    }

    #[test]
    fn test_try_from_value_reports_index() {
        let value = json!([
            {"tags": ["a"], "payload": ["x"]},
            {"tags": ["b"], "payload": ["y"]},
            {"tags": ["c"]},
        ]);
        let err = Engine::try_from_value(&value, None).unwrap_err();
        assert_eq!(err.index(), Some(2));
    }

    #[test]
    fn test_try_from_value_builds_engine() {
        let value = json!([{"tags": ["a", "b"], "value": ["x"]}]);
        let engine = Engine::try_from_value(&value, None).unwrap();
        assert_eq!(engine.remaining_tags(), ["a", "b"]);
    }

    #[test]
    fn test_derive_is_pure() {
        let records = wider_records();
        let first = derive(&records, &["d"]);
        let second = derive(&records, &["d"]);
        assert_eq!(first, second);
        assert_eq!(first.matched_records.len(), 2);
        assert_eq!(first.remaining_tags, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_snapshot_is_independent_copy() {
        let mut engine = Engine::initialize(sample_records(), None);
        let snapshot = engine.snapshot();
        engine.select_tag("project");
        assert!(snapshot.selected_tags.is_empty());
        assert_ne!(&snapshot, engine.state());
    }
}

//! Output formatting for CLI display
//!
//! Quiet mode strips decoration so output can be piped.

use crate::db::{RecordWithTags, Tag};
use crate::engine::{Record, SelectionState};
use colored::Colorize;

/// Bracketed, comma-separated tag list
#[must_use]
pub fn tag_list<S: AsRef<str>>(tags: &[S]) -> String {
    let names: Vec<&str> = tags.iter().map(|tag| tag.as_ref()).collect();
    format!("[{}]", names.join(", "))
}

/// One stored record on a single line
#[must_use]
pub fn stored_record_line(record: &RecordWithTags, quiet: bool) -> String {
    if quiet {
        return record.record.id.to_string();
    }
    let tags = record.tag_names();
    let tags = if tags.is_empty() {
        "(no tags)".dimmed().to_string()
    } else {
        tag_list(&tags).cyan().to_string()
    };
    format!(
        "  {} {} {} ({} {})",
        format!("#{}", record.record.id).yellow(),
        record.record.title.bold(),
        tags,
        record.record.payload.len(),
        record.record.kind,
    )
}

/// A stored record with its payload, one entry per line
#[must_use]
pub fn stored_record_detail(record: &RecordWithTags) -> String {
    let stored = &record.record;
    let mut lines = vec![
        format!("{} {}", format!("#{}", stored.id).yellow(), stored.title.bold()),
        format!("  tags:    {}", tag_list(&record.tag_names()).cyan()),
        format!("  kind:    {}", stored.kind),
        format!("  created: {}", stored.created_at.format("%Y-%m-%d %H:%M:%S")),
        format!("  updated: {}", stored.updated_at.format("%Y-%m-%d %H:%M:%S")),
        "  payload:".to_string(),
    ];
    lines.extend(stored.payload.lines().into_iter().map(|line| format!("    {line}")));
    lines.join("\n")
}

/// Tag with usage count
#[must_use]
pub fn tag_with_count(tag: &Tag, count: usize, quiet: bool) -> String {
    if quiet {
        tag.name.clone()
    } else {
        let color = tag
            .color
            .as_deref()
            .map(|c| format!(" {}", c.dimmed()))
            .unwrap_or_default();
        format!("  {}{color} (used by {count} record(s))", tag.name.green())
    }
}

/// An engine record: tags then payload entries
#[must_use]
pub fn record_block(record: &Record, quiet: bool) -> String {
    if quiet {
        return record.payload.lines().join("\n");
    }
    let mut lines = vec![format!("  {}", tag_list(&record.tags).cyan())];
    lines.extend(record.payload.lines().into_iter().map(|line| format!("    {line}")));
    lines.join("\n")
}

/// Full selection summary
///
/// Quiet mode prints only the remaining tags, one per line.
#[must_use]
pub fn selection_summary(state: &SelectionState, quiet: bool) -> String {
    if quiet {
        return state.remaining_tags.join("\n");
    }

    let selected = if state.selected_tags.is_empty() {
        "(none)".dimmed().to_string()
    } else {
        tag_list(&state.selected_tags).green().to_string()
    };
    let remaining = if state.is_exhausted() {
        "(none)".dimmed().to_string()
    } else {
        tag_list(&state.remaining_tags).cyan().to_string()
    };

    let mut lines = vec![
        format!("Selected:  {selected}"),
        format!(
            "Matched:   {} of {} record(s)",
            state.matched_records.len(),
            state.records().len()
        ),
        format!("Remaining: {remaining}"),
    ];
    for record in &state.matched_records {
        lines.push(record_block(record, false));
    }
    lines.join("\n")
}

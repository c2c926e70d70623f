//! Coarse positional change summary.
//!
//! Line `i` of the old text against line `i` of the new text, no
//! resynchronization. Deliberately cruder than the differ: one inserted
//! line marks every following line as modified. Collaborators use this for
//! a cheap "did anything change, roughly how" signal, never for patching.

use serde::{Deserialize, Serialize};

use crate::lines::split_lines;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Add,
    Delete,
    Modify,
}

/// A flattened, position-tagged delta. `line_number` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub content: String,
    pub line_number: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub changes: Vec<ChangeRecord>,
    pub has_content_change: bool,
}

/// Compare two texts position by position.
///
/// A line present in both but different is `Modify` (carrying the new
/// content); a line only in the new text is `Add`; a line only in the old
/// text is `Delete`.
pub fn extract_changes(old_text: &str, new_text: &str) -> ChangeSummary {
    let old_lines = split_lines(old_text);
    let new_lines = split_lines(new_text);

    let mut changes = Vec::new();
    for i in 0..old_lines.len().max(new_lines.len()) {
        match (old_lines.get(i), new_lines.get(i)) {
            (Some(old), Some(new)) if old == new => {}
            (Some(_), Some(new)) => changes.push(ChangeRecord {
                kind: ChangeKind::Modify,
                content: new.to_string(),
                line_number: i,
            }),
            (None, Some(new)) => changes.push(ChangeRecord {
                kind: ChangeKind::Add,
                content: new.to_string(),
                line_number: i,
            }),
            (Some(old), None) => changes.push(ChangeRecord {
                kind: ChangeKind::Delete,
                content: old.to_string(),
                line_number: i,
            }),
            (None, None) => unreachable!("loop is bounded by the longer text"),
        }
    }

    ChangeSummary {
        has_content_change: !changes.is_empty(),
        changes,
    }
}

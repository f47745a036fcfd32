//! Insight notes and selection parsing.
//!
//! Each chunk of a focus turn gets one background annotation (an insight
//! note). A later selection call picks 0-3 note ids; the reply is parsed
//! by extracting every integer substring — pure text scanning, no I/O.

use serde::{Deserialize, Serialize};

/// Placeholder selected point when a turn produced no insight notes.
pub const NO_SELECTED_POINT: &str = "none";

/// A per-chunk background annotation.
///
/// `id` is the chunk's 0-based emission index. Notes are appended in
/// completion order, which is not chunk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightNote {
    pub id: usize,
    pub chunk: String,
    pub note: String,
}

impl InsightNote {
    pub fn new(id: usize, chunk: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            id,
            chunk: chunk.into(),
            note: note.into(),
        }
    }
}

/// Extract every integer substring from a selection reply.
///
/// The selector is asked for a bare id list like `[1, 3]`, but models
/// wrap it in prose often enough that we just scan for digit runs.
/// Duplicates are kept; callers match ids against the notes they hold.
pub fn extract_note_ids(reply: &str) -> Vec<usize> {
    let mut ids = Vec::new();
    let mut current = String::new();

    for c in reply.chars() {
        if c.is_ascii_digit() {
            current.push(c);
        } else if !current.is_empty() {
            if let Ok(id) = current.parse() {
                ids.push(id);
            }
            current.clear();
        }
    }
    if !current.is_empty()
        && let Ok(id) = current.parse()
    {
        ids.push(id);
    }

    ids
}

/// Assemble the "selected point" from chosen note ids.
///
/// Matching notes are concatenated in ascending id order, each prefixed
/// with its id. Returns `None` when no id matches any note, which callers
/// treat as "fall back to the most recently appended note".
pub fn build_selected_point(notes: &[InsightNote], chosen_ids: &[usize]) -> Option<String> {
    let mut ids: Vec<usize> = chosen_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let selected: Vec<String> = ids
        .iter()
        .filter_map(|id| {
            notes
                .iter()
                .find(|n| n.id == *id)
                .map(|n| format!("[point {}]: {}", n.id, n.note))
        })
        .collect();

    if selected.is_empty() {
        None
    } else {
        Some(selected.join("\n\n"))
    }
}

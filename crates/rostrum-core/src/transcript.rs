//! Transcript formatting for the feedback judge

use crate::history::TurnRecord;

/// Render records as a role-tagged, ordered, human-readable transcript.
///
/// Each record becomes `[position] Speaker: content`; records are separated
/// by a blank line. The output depends only on the input order and content.
pub fn format_transcript(records: &[TurnRecord]) -> String {
    records
        .iter()
        .map(|r| format!("[{}] {}: {}", r.position, r.speaker, r.content.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

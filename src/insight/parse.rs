//! Response parsing for raw model text.

use super::{ReferenceList, ReferenceSource, MAX_REFERENCES};

/// Narrative text is passed through untouched. Empty output is still a success.
pub fn parse_narrative(raw: String) -> String {
    raw
}

/// Split a reference reply into lines, drop blank ones and keep the first four.
///
/// A reply with fewer than four non-blank lines yields a shorter list; it is
/// not padded with fallback entries.
pub fn parse_references(raw: &str) -> ReferenceList {
    let entries = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(MAX_REFERENCES)
        .map(str::to_string)
        .collect();
    ReferenceList::new(entries, ReferenceSource::Model)
}

//! Labeled placeholder references used when reference generation fails.

use super::{ObjectName, ReferenceList, ReferenceSource};

/// Marker appended to every fallback entry.
pub const EXAMPLE_MARKER: &str = "(Example)";

/// Four deterministic placeholder references for `object_name`.
pub fn fallback_references(object_name: &ObjectName) -> ReferenceList {
    let name = object_name.as_str();
    let entries = vec![
        format!("AI-Generated Reference: Research on {name} - Astronomical Journal {EXAMPLE_MARKER}"),
        format!(
            "AI-Generated Reference: Observational Study of {name} - Astrophysics Review {EXAMPLE_MARKER}"
        ),
        format!(
            "AI-Generated Reference: Analysis of {name} Properties - Space Science Letters {EXAMPLE_MARKER}"
        ),
        format!(
            "AI-Generated Reference: {name} in Modern Astronomy - Observatory Reports {EXAMPLE_MARKER}"
        ),
    ];
    ReferenceList::new(entries, ReferenceSource::Fallback)
}

//! Insight Generation
//!
//! Turns the name of an astronomical object into a narrative analysis and a short
//! list of citation-shaped reference strings by delegating to a [`ModelClient`].
//! References are illustrative; nothing here checks them against a real catalog.
//!
//! [`ModelClient`]: crate::provider::ModelClient

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

pub mod fallback;
pub mod lifecycle;
pub mod orchestrator;
pub mod parse;
pub mod prompt;

pub use fallback::fallback_references;
pub use lifecycle::{LifecycleController, RequestState, RequestTicket, SubmitOutcome};
pub use orchestrator::InsightOrchestrator;
pub use parse::{parse_narrative, parse_references};
pub use prompt::{build_prompt, build_summary_prompt, PromptKind};

/// Upper bound on the number of references attached to one result.
pub const MAX_REFERENCES: usize = 4;

/// Trimmed, non-empty name of an astronomical subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectName(String);

impl ObjectName {
    /// Returns `None` when the input is empty after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where the entries of a [`ReferenceList`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSource {
    Model,
    Fallback,
}

/// Ordered reference strings, at most [`MAX_REFERENCES`] long.
///
/// Fallback lists always hold exactly four entries. Parsed lists are truncated
/// to four but never padded, so a terse model reply yields a shorter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceList {
    entries: Vec<String>,
    source: ReferenceSource,
}

impl ReferenceList {
    pub(crate) fn new(entries: Vec<String>, source: ReferenceSource) -> Self {
        debug_assert!(entries.len() <= MAX_REFERENCES);
        Self { entries, source }
    }

    pub fn source(&self) -> ReferenceSource {
        self.source
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ReferenceSource::Fallback
    }

    pub fn into_vec(self) -> Vec<String> {
        self.entries
    }
}

impl Deref for ReferenceList {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a ReferenceList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for ReferenceList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

/// Narrative plus references produced by one successful orchestration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightResult {
    narrative: String,
    references: ReferenceList,
}

impl InsightResult {
    pub fn new(narrative: String, references: ReferenceList) -> Self {
        Self {
            narrative,
            references,
        }
    }

    pub fn narrative(&self) -> &str {
        &self.narrative
    }

    pub fn references(&self) -> &ReferenceList {
        &self.references
    }
}

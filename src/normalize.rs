//! Concept normalization: free-text labels to ConceptNet identifiers.
//!
//! The remote service addresses concepts by URI path segments such as
//! `/c/en/golden_retriever`. Everything here is infallible: input that
//! normalizes to nothing yields an empty identifier, which the service answers
//! with an empty edge list.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_INVALID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9_]+").unwrap());

/// Normalize a concept string into an identifier.
///
/// Trims, lowercases, turns whitespace runs into a single `_` and removes any
/// character outside `[a-z0-9_]`.
pub fn normalize(concept: &str) -> String {
    let lower = concept.trim().to_lowercase();
    let joined = RE_WHITESPACE.replace_all(&lower, "_");
    RE_INVALID.replace_all(&joined, "").into_owned()
}

/// A normalized concept identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptId(String);

impl ConceptId {
    /// Normalize `concept` into an identifier.
    pub fn new(concept: &str) -> Self {
        Self(normalize(concept))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// ConceptNet URI path, e.g. `/c/en/dog`.
    pub fn uri(&self, language: &str) -> String {
        format!("/c/{language}/{}", self.0)
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deduplicate an object list case-insensitively.
///
/// Entries are trimmed and blank ones dropped. The first occurrence wins and
/// keeps its original casing; order is preserved.
pub fn dedup_objects<S: AsRef<str>>(objects: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for object in objects {
        let trimmed = object.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            out.push(trimmed.to_string());
        }
    }
    out
}

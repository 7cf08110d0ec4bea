//! Sentence rendering for ranked facts.
//!
//! These are lightweight, rule-based templates, not a grammar engine. The
//! article and plural tests are deliberately crude and operate on the first
//! and last characters of the lowercased phrase: silent letters, loanwords and
//! irregular plurals are not handled.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::edge::FactKey;

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Words that already act as a determiner at the start of a phrase.
const DETERMINERS: &[&str] = &["a ", "an ", "the ", "this ", "that ", "these ", "those "];

/// Determiners that keep an IsA object from getting another article.
const ISA_DETERMINERS: &[&str] = &["a ", "an ", "the "];

/// A relation label, split into the known templated set and everything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Relation {
    IsA,
    PartOf,
    HasA,
    UsedFor,
    CapableOf,
    ReceivesAction,
    AtLocation,
    LocatedNear,
    HasProperty,
    /// Any other relation; rendered with the label verbatim.
    Other(String),
}

impl Relation {
    /// The nine relations that have a sentence template.
    pub const KNOWN: [Relation; 9] = [
        Relation::IsA,
        Relation::PartOf,
        Relation::HasA,
        Relation::UsedFor,
        Relation::CapableOf,
        Relation::ReceivesAction,
        Relation::AtLocation,
        Relation::LocatedNear,
        Relation::HasProperty,
    ];

    pub fn parse(label: &str) -> Self {
        match label {
            "IsA" => Self::IsA,
            "PartOf" => Self::PartOf,
            "HasA" => Self::HasA,
            "UsedFor" => Self::UsedFor,
            "CapableOf" => Self::CapableOf,
            "ReceivesAction" => Self::ReceivesAction,
            "AtLocation" => Self::AtLocation,
            "LocatedNear" => Self::LocatedNear,
            "HasProperty" => Self::HasProperty,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::IsA => "IsA",
            Self::PartOf => "PartOf",
            Self::HasA => "HasA",
            Self::UsedFor => "UsedFor",
            Self::CapableOf => "CapableOf",
            Self::ReceivesAction => "ReceivesAction",
            Self::AtLocation => "AtLocation",
            Self::LocatedNear => "LocatedNear",
            Self::HasProperty => "HasProperty",
            Self::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Fill this relation's template with a subject and object phrase.
    fn template(&self, subject: &str, object: &str) -> String {
        let s = maybe_article(subject);
        match self {
            Self::IsA => {
                let lower = object.to_lowercase();
                let o = if ISA_DETERMINERS.iter().any(|d| lower.starts_with(d)) {
                    object.to_string()
                } else {
                    maybe_article(object)
                };
                format!("{s} is {o}")
            }
            Self::PartOf => format!("{s} is part of {}", maybe_article(object)),
            Self::HasA => format!("{s} has {}", maybe_article(object)),
            Self::UsedFor => format!("{s} is used for {object}"),
            Self::CapableOf => format!("{s} can {object}"),
            Self::ReceivesAction | Self::HasProperty => format!("{s} can be {object}"),
            Self::AtLocation => format!("{s} is often found in {}", maybe_article(object)),
            Self::LocatedNear => format!("{s} is often near {}", maybe_article(object)),
            Self::Other(label) => format!("{subject} {label} {object}"),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Choose "a" or "an": "an" when the phrase starts with a vowel letter.
pub fn choose_article(phrase: &str) -> &'static str {
    let lower = phrase.trim().to_lowercase();
    match lower.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Prefix an indefinite article unless the phrase is empty, already starts
/// with a determiner, or looks plural.
pub fn maybe_article(phrase: &str) -> String {
    let trimmed = phrase.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lower = trimmed.to_lowercase();
    if DETERMINERS.iter().any(|d| lower.starts_with(d)) {
        return trimmed.to_string();
    }
    // Plural-ish: "cats" but not "glass" or "bus".
    if lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") {
        return trimmed.to_string();
    }
    format!("{} {trimmed}", choose_article(trimmed))
}

/// Capitalize the first letter of a string.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => {
            let upper: String = c.to_uppercase().collect();
            upper + chars.as_str()
        }
    }
}

/// Render a (subject, relation, object) triple as a sentence.
pub fn render_sentence(subject: &str, relation: &str, object: &str) -> String {
    let subject = subject.replace('_', " ");
    let object = object.replace('_', " ");
    let raw = Relation::parse(relation).template(subject.trim(), object.trim());

    let collapsed = RE_WHITESPACE.replace_all(&raw, " ");
    let body = collapsed.trim().trim_end_matches('.').trim_end();
    format!("{}.", capitalize(body))
}

/// Render a fact key as a sentence.
pub fn render_fact(key: &FactKey) -> String {
    render_sentence(&key.start, &key.relation, &key.end)
}

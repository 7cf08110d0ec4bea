//! Fact deduplication and ranking.
//!
//! Edges from the per-object and pairwise phases are folded into one
//! accumulator keyed by [`FactKey`]. Each key keeps the highest weight seen.
//! Keys remember the order they were first seen in, which breaks weight ties
//! so the same responses always rank identically.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;

use crate::edge::{Edge, FactKey, RawEdge};
use crate::render;

/// A deduplicated fact with its winning weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFact {
    #[serde(flatten)]
    pub key: FactKey,
    pub weight: f64,
}

impl RankedFact {
    pub fn sentence(&self) -> String {
        render::render_fact(&self.key)
    }
}

/// Max-weight accumulator over fact keys.
#[derive(Debug, Default)]
pub struct FactAccumulator {
    facts: Vec<RankedFact>,
    index: HashMap<FactKey, usize>,
}

impl FactAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a raw edge. Edges without start, relation or end labels are
    /// dropped. Returns whether the accumulator changed.
    pub fn offer(&mut self, edge: &RawEdge) -> bool {
        match edge.resolve() {
            Some(resolved) => self.insert(resolved),
            None => {
                tracing::trace!(?edge, "dropping edge with missing labels");
                false
            }
        }
    }

    /// Insert a resolved edge, keeping the larger weight for an existing key.
    pub fn insert(&mut self, edge: Edge) -> bool {
        match self.index.entry(edge.key) {
            Entry::Occupied(slot) => {
                let fact = &mut self.facts[*slot.get()];
                if edge.weight > fact.weight {
                    fact.weight = edge.weight;
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(slot) => {
                let key = slot.key().clone();
                slot.insert(self.facts.len());
                self.facts.push(RankedFact {
                    key,
                    weight: edge.weight,
                });
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Best weight recorded for `key`.
    pub fn weight_of(&self, key: &FactKey) -> Option<f64> {
        self.index.get(key).map(|&i| self.facts[i].weight)
    }

    /// Sort by weight, highest first, and keep at most `max_facts`.
    pub fn into_ranked(self, max_facts: usize) -> Vec<RankedFact> {
        let mut facts = self.facts;
        // Stable: equal weights stay in first-seen order.
        facts.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        facts.truncate(max_facts);
        facts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_keys_keep_max_weight() {
        let mut acc = FactAccumulator::new();
        assert!(acc.offer(&RawEdge::new("dog", "IsA", "animal", 2.0)));
        assert!(acc.offer(&RawEdge::new("dog", "IsA", "animal", 5.0)));
        assert!(!acc.offer(&RawEdge::new("dog", "IsA", "animal", 3.0)));

        let key = FactKey::new("dog", "IsA", "animal");
        assert_eq!(acc.weight_of(&key), Some(5.0));

        let ranked = acc.into_ranked(10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].key, key);
        assert_eq!(ranked[0].weight, 5.0);
    }

    #[test]
    fn ranking_is_descending_and_truncated() {
        let mut acc = FactAccumulator::new();
        acc.offer(&RawEdge::new("dog", "IsA", "pet", 1.5));
        acc.offer(&RawEdge::new("dog", "CapableOf", "bark", 6.0));
        acc.offer(&RawEdge::new("dog", "AtLocation", "park", 3.2));

        let ranked = acc.into_ranked(2);
        let weights: Vec<f64> = ranked.iter().map(|f| f.weight).collect();
        assert_eq!(weights, vec![6.0, 3.2]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let mut acc = FactAccumulator::new();
        acc.offer(&RawEdge::new("b", "IsA", "x", 2.0));
        acc.offer(&RawEdge::new("a", "IsA", "x", 2.0));
        acc.offer(&RawEdge::new("c", "IsA", "x", 2.0));

        let starts: Vec<String> = acc
            .into_ranked(10)
            .into_iter()
            .map(|f| f.key.start)
            .collect();
        assert_eq!(starts, vec!["b", "a", "c"]);
    }

    #[test]
    fn unlabelled_edges_are_dropped() {
        let mut acc = FactAccumulator::new();
        let mut edge = RawEdge::new("dog", "IsA", "animal", 2.0);
        edge.end = None;
        assert!(!acc.offer(&edge));
        assert!(acc.is_empty());
    }

    #[test]
    fn zero_max_facts_yields_nothing() {
        let mut acc = FactAccumulator::new();
        acc.offer(&RawEdge::new("dog", "IsA", "animal", 2.0));
        assert_eq!(acc.len(), 1);
        assert!(acc.into_ranked(0).is_empty());
    }

    #[test]
    fn ranked_fact_renders_sentence() {
        let fact = RankedFact {
            key: FactKey::new("dog", "CapableOf", "run"),
            weight: 2.0,
        };
        assert_eq!(fact.sentence(), "A dog can run.");
    }
}

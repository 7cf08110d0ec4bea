//! Edge filtering by relation and weight.

use std::collections::BTreeSet;

use crate::edge::RawEdge;

/// Keep/drop policy applied to every fetched edge.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationFilter {
    relations: BTreeSet<String>,
    min_weight: f64,
}

impl RelationFilter {
    pub fn new<I, S>(relations: I, min_weight: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            relations: relations.into_iter().map(Into::into).collect(),
            min_weight,
        }
    }

    /// Whether `edge` has an allowed relation and a weight of at least
    /// `min_weight`. Edges without a relation label are always dropped.
    pub fn keep(&self, edge: &RawEdge) -> bool {
        match edge.relation() {
            Some(relation) => self.relations.contains(relation) && edge.weight() >= self.min_weight,
            None => false,
        }
    }

    pub fn relations(&self) -> &BTreeSet<String> {
        &self.relations
    }

    pub fn min_weight(&self) -> f64 {
        self.min_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn default_filter() -> RelationFilter {
        RelationFilter::new(["IsA", "AtLocation", "CapableOf"], 1.0)
    }

    #[test]
    fn keeps_allowed_relation_at_threshold() {
        let filter = default_filter();
        assert!(filter.keep(&RawEdge::new("dog", "IsA", "animal", 1.0)));
        assert!(filter.keep(&RawEdge::new("dog", "AtLocation", "park", 3.2)));
    }

    #[test]
    fn drops_low_weight() {
        let filter = default_filter();
        assert!(!filter.keep(&RawEdge::new("dog", "IsA", "animal", 0.99)));
    }

    #[test]
    fn drops_disallowed_relation() {
        let filter = default_filter();
        assert!(!filter.keep(&RawEdge::new("hot", "Antonym", "cold", 9.0)));

        let with_antonym = RelationFilter::new(["Antonym"], 1.0);
        assert!(with_antonym.keep(&RawEdge::new("hot", "Antonym", "cold", 9.0)));
    }

    #[test]
    fn missing_relation_or_weight() {
        let filter = default_filter();
        let no_rel: RawEdge = serde_json::from_value(json!({
            "start": {"label": "dog"}, "end": {"label": "park"}, "weight": 5.0
        }))
        .unwrap();
        assert!(!filter.keep(&no_rel));

        let no_weight: RawEdge = serde_json::from_value(json!({
            "start": {"label": "dog"}, "rel": {"label": "IsA"}, "end": {"label": "pet"}
        }))
        .unwrap();
        assert!(!filter.keep(&no_weight));
        assert!(RelationFilter::new(["IsA"], 0.0).keep(&no_weight));
    }
}

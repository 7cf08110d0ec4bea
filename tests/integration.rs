//! End-to-end tests for scene-facts.
//!
//! These tests drive the full pipeline (dedup, lookups, filtering, ranking and
//! rendering) against canned ConceptNet responses.

use std::collections::HashSet;

use scene_facts::config::FactsConfig;
use scene_facts::edge::RawEdge;
use scene_facts::error::{FactsError, FetchError};
use scene_facts::pipeline::{FactFinder, facts_for_image};
use scene_facts::source::{Lookup, MemorySource};

fn dog_park_source() -> MemorySource {
    MemorySource::new()
        .with_concept(
            "dog",
            vec![
                RawEdge::new("dog", "IsA", "animal", 2.0),
                RawEdge::new("dog", "CapableOf", "run", 4.5),
                RawEdge::new("dog", "RelatedTo", "bark", 9.0),
                RawEdge::new("dog", "HasA", "tail", 0.5),
                RawEdge::new("dog", "IsA", "animal", 5.0),
            ],
        )
        .with_concept(
            "park",
            vec![
                RawEdge::new("park", "UsedFor", "recreation", 3.0),
                RawEdge::new("hot", "Antonym", "cold", 7.0),
            ],
        )
        .with_pair(
            "dog",
            "park",
            vec![
                RawEdge::new("dog", "AtLocation", "park", 3.2),
                RawEdge::new("dog", "IsA", "animal", 1.0),
            ],
        )
}

#[test]
fn dog_in_park_scenario() {
    let source = MemorySource::new().with_concept(
        "dog",
        vec![RawEdge::new("dog", "AtLocation", "park", 3.2)],
    );
    let facts = facts_for_image(source, &["dog", "park"], FactsConfig::default()).unwrap();
    assert_eq!(facts, vec!["A dog is often found in a park."]);
}

#[test]
fn end_to_end_ranking_and_rendering() {
    let finder = FactFinder::new(dog_park_source(), FactsConfig::default());
    let facts = finder.facts(&["dog", "park"]).unwrap();
    assert_eq!(
        facts,
        vec![
            "A dog is an animal.",
            "A dog can run.",
            "A dog is often found in a park.",
            "A park is used for recreation.",
        ]
    );
}

#[test]
fn duplicate_triples_keep_max_weight_across_phases() {
    let finder = FactFinder::new(dog_park_source(), FactsConfig::default());
    let ranked = finder.ranked_facts(&["dog", "park"]).unwrap();

    let animal: Vec<_> = ranked
        .iter()
        .filter(|f| f.key.start == "dog" && f.key.relation == "IsA" && f.key.end == "animal")
        .collect();
    assert_eq!(animal.len(), 1);
    assert_eq!(animal[0].weight, 5.0);
}

#[test]
fn output_invariants_hold() {
    let config = FactsConfig {
        max_facts: 3,
        ..Default::default()
    };
    let finder = FactFinder::new(dog_park_source(), config);
    let ranked = finder.ranked_facts(&["dog", "park", "Dog"]).unwrap();

    assert!(ranked.len() <= 3);
    let keys: HashSet<_> = ranked.iter().map(|f| f.key.clone()).collect();
    assert_eq!(keys.len(), ranked.len());
    assert!(ranked.windows(2).all(|w| w[0].weight >= w[1].weight));
}

#[test]
fn unknown_relation_needs_explicit_opt_in() {
    let default_facts = FactFinder::new(dog_park_source(), FactsConfig::default())
        .facts(&["park"])
        .unwrap();
    assert!(default_facts.iter().all(|s| !s.contains("Antonym")));

    let config = FactsConfig::default().with_relations(["Antonym"]);
    let facts = FactFinder::new(dog_park_source(), config)
        .facts(&["park"])
        .unwrap();
    assert_eq!(facts, vec!["Hot Antonym cold."]);
}

#[test]
fn objects_are_deduplicated_case_insensitively() {
    let finder = FactFinder::new(dog_park_source(), FactsConfig::default());
    finder.facts(&["Dog", "dog", " park", "PARK", ""]).unwrap();

    let served = finder.source().served();
    assert_eq!(served.len(), 3);
    assert!(matches!(&served[0], Lookup::Concept { id, .. } if id.as_str() == "dog"));
    assert!(matches!(&served[1], Lookup::Concept { id, .. } if id.as_str() == "park"));
    assert!(matches!(&served[2], Lookup::Pair { .. }));
}

#[test]
fn limits_are_passed_to_each_lookup_kind() {
    let config = FactsConfig {
        per_object_limit: 7,
        pair_limit: 3,
        ..Default::default()
    };
    let finder = FactFinder::new(dog_park_source(), config);
    finder.facts(&["dog", "park"]).unwrap();

    for lookup in finder.source().served() {
        match lookup {
            Lookup::Concept { limit, .. } => assert_eq!(limit, 7),
            Lookup::Pair { limit, .. } => assert_eq!(limit, 3),
        }
    }
}

#[test]
fn repeated_runs_are_identical() {
    let finder = FactFinder::new(dog_park_source(), FactsConfig::default());
    let first = finder.facts(&["dog", "park"]).unwrap();
    let second = finder.facts(&["dog", "park"]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn parallel_fetching_matches_sequential() {
    let objects = ["dog", "park", "bench", "frisbee"];
    let sequential = FactFinder::new(dog_park_source(), FactsConfig::default())
        .facts(&objects)
        .unwrap();
    let parallel = FactFinder::new(
        dog_park_source(),
        FactsConfig {
            parallel: true,
            ..Default::default()
        },
    )
    .facts(&objects)
    .unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn failed_lookup_aborts_the_request() {
    let source = dog_park_source().failing_on("park");
    let result = FactFinder::new(source, FactsConfig::default()).facts(&["dog", "park"]);
    assert!(matches!(
        result,
        Err(FactsError::Fetch(FetchError::Transport { .. }))
    ));
}

#[test]
fn malformed_edges_are_dropped_not_fatal() {
    let fixture = r#"{
        "concepts": {
            "dog": {"edges": [
                {"start": {"label": "dog"}, "rel": {"label": "CapableOf"}, "end": {"label": "swim"}, "weight": "2.5"},
                {"start": {"label": "dog"}, "rel": {"label": "IsA"}, "weight": 8.0},
                {"start": {"@id": "/c/en/guide_dog"}, "rel": {"label": "UsedFor"}, "end": {"label": "guiding"}, "weight": 3.0},
                {"rel": {"label": "IsA"}, "end": {"label": "pet"}, "weight": 9.0},
                {"start": {"label": "dog"}, "rel": {"label": "HasA"}, "end": {"label": "nose"}, "weight": "very"}
            ]}
        }
    }"#;
    let source = MemorySource::from_json(fixture).unwrap();
    let facts = FactFinder::new(source, FactsConfig::default())
        .facts(&["dog"])
        .unwrap();
    assert_eq!(facts, vec!["A guide dog is used for guiding.", "A dog can swim."]);
}

#[test]
fn empty_relation_set_means_default_relations() {
    let source = MemorySource::new().with_concept(
        "dog",
        vec![
            RawEdge::new("dog", "CapableOf", "run", 2.0),
            RawEdge::new("hot", "Antonym", "cold", 7.0),
        ],
    );
    let config = FactsConfig::default().with_relations(Vec::<String>::new());
    let facts = FactFinder::new(source, config).facts(&["dog"]).unwrap();
    assert_eq!(facts, vec!["A dog can run."]);
}

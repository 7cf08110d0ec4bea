// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # scene-facts
//!
//! Enriches a list of detected image objects with short common-sense facts
//! from the ConceptNet knowledge graph.
//!
//! ## Pipeline
//!
//! - **Normalize** (`normalize`): concept strings to ConceptNet identifiers
//! - **Fetch** (`source`): per-object and pairwise edge lookups
//! - **Filter** (`filter`): allowed relations and a minimum weight
//! - **Rank** (`rank`): deduplicate by (start, relation, end), keep the max weight
//! - **Render** (`render`): per-relation sentence templates
//!
//! ## Library usage
//!
//! ```no_run
//! use scene_facts::config::FactsConfig;
//! use scene_facts::pipeline::FactFinder;
//! use scene_facts::source::ConceptNetClient;
//!
//! let config = FactsConfig::default();
//! let finder = FactFinder::new(ConceptNetClient::new(&config), config);
//! for sentence in finder.facts(&["dog", "frisbee", "park"]).unwrap() {
//!     println!("{sentence}");
//! }
//! ```

pub mod config;
pub mod edge;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod rank;
pub mod render;
pub mod source;

//! Top-level fact lookup for a list of image objects.
//!
//! Objects are deduplicated, then looked up one by one and pairwise. Every
//! returned edge is filtered and folded into a [`FactAccumulator`] in query
//! order, so parallel and sequential fetching rank identically. Any failed
//! lookup aborts the whole request.

use crate::config::FactsConfig;
use crate::edge::RawEdge;
use crate::error::{FactsResult, FetchResult};
use crate::normalize::{ConceptId, dedup_objects};
use crate::rank::{FactAccumulator, RankedFact};
use crate::source::{EdgeSource, Lookup};

/// Finds and renders facts for sets of objects against one edge source.
pub struct FactFinder<S> {
    source: S,
    config: FactsConfig,
}

impl<S: EdgeSource> FactFinder<S> {
    pub fn new(source: S, config: FactsConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &FactsConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Rendered sentences, most confident first.
    pub fn facts<T: AsRef<str>>(&self, objects: &[T]) -> FactsResult<Vec<String>> {
        Ok(self
            .ranked_facts(objects)?
            .iter()
            .map(RankedFact::sentence)
            .collect())
    }

    /// Deduplicated facts with their winning weights, highest first.
    pub fn ranked_facts<T: AsRef<str>>(&self, objects: &[T]) -> FactsResult<Vec<RankedFact>> {
        self.config.validate()?;

        let objects = dedup_objects(objects);
        let _span = tracing::info_span!("ranked_facts", objects = objects.len()).entered();

        let lookups = self.plan(&objects);
        let responses = self.fetch_all(&lookups)?;

        let filter = self.config.filter();
        let mut accumulator = FactAccumulator::new();
        let mut seen = 0usize;
        let mut kept = 0usize;
        for edges in &responses {
            for edge in edges {
                seen += 1;
                if filter.keep(edge) {
                    kept += 1;
                    accumulator.offer(edge);
                }
            }
        }

        let unique = accumulator.len();
        let ranked = accumulator.into_ranked(self.config.max_facts);
        tracing::info!(
            lookups = lookups.len(),
            edges = seen,
            kept,
            unique,
            returned = ranked.len(),
            "collected facts"
        );
        Ok(ranked)
    }

    /// Per-object lookups in list order, then every unordered pair.
    fn plan(&self, objects: &[String]) -> Vec<Lookup> {
        let ids: Vec<ConceptId> = objects.iter().map(|o| ConceptId::new(o)).collect();
        for (object, id) in objects.iter().zip(&ids) {
            if id.is_empty() {
                tracing::warn!(object = %object, "object normalizes to an empty identifier");
            }
        }

        let mut lookups: Vec<Lookup> = ids
            .iter()
            .map(|id| Lookup::Concept {
                id: id.clone(),
                limit: self.config.per_object_limit,
            })
            .collect();
        for (i, node) in ids.iter().enumerate() {
            for other in &ids[i + 1..] {
                lookups.push(Lookup::Pair {
                    node: node.clone(),
                    other: other.clone(),
                    limit: self.config.pair_limit,
                });
            }
        }
        lookups
    }

    /// Run every lookup. Results come back in `lookups` order either way.
    fn fetch_all(&self, lookups: &[Lookup]) -> FetchResult<Vec<Vec<RawEdge>>> {
        if self.config.parallel {
            use rayon::prelude::*;

            lookups
                .par_iter()
                .map(|lookup| self.fetch_one(lookup))
                .collect()
        } else {
            lookups.iter().map(|lookup| self.fetch_one(lookup)).collect()
        }
    }

    fn fetch_one(&self, lookup: &Lookup) -> FetchResult<Vec<RawEdge>> {
        let edges = self.source.fetch(lookup)?;
        tracing::debug!(?lookup, edges = edges.len(), "lookup complete");
        Ok(edges)
    }
}

/// Look up facts for `objects` in one call.
pub fn facts_for_image<S, T>(source: S, objects: &[T], config: FactsConfig) -> FactsResult<Vec<String>>
where
    S: EdgeSource,
    T: AsRef<str>,
{
    FactFinder::new(source, config).facts(objects)
}

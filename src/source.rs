//! Edge sources: where raw edges come from.
//!
//! [`ConceptNetClient`] talks to the live ConceptNet API with a blocking
//! `ureq` agent. [`MemorySource`] serves canned responses and backs the
//! offline `--fixture` mode and the tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::config::FactsConfig;
use crate::edge::{EdgeResponse, RawEdge};
use crate::error::{FetchError, FetchResult};
use crate::normalize::ConceptId;

/// One remote lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lookup {
    /// All edges of a single concept.
    Concept { id: ConceptId, limit: usize },
    /// Edges directly connecting two concepts.
    Pair {
        node: ConceptId,
        other: ConceptId,
        limit: usize,
    },
}

/// Anything that can answer concept and pair lookups.
pub trait EdgeSource: Sync {
    /// Edges of one concept, at most `limit`.
    fn concept_edges(&self, id: &ConceptId, limit: usize) -> FetchResult<Vec<RawEdge>>;

    /// Edges connecting `node` and `other`, at most `limit`.
    fn pair_edges(
        &self,
        node: &ConceptId,
        other: &ConceptId,
        limit: usize,
    ) -> FetchResult<Vec<RawEdge>>;

    fn fetch(&self, lookup: &Lookup) -> FetchResult<Vec<RawEdge>> {
        match lookup {
            Lookup::Concept { id, limit } => self.concept_edges(id, *limit),
            Lookup::Pair { node, other, limit } => self.pair_edges(node, other, *limit),
        }
    }
}

impl<S: EdgeSource + ?Sized> EdgeSource for &S {
    fn concept_edges(&self, id: &ConceptId, limit: usize) -> FetchResult<Vec<RawEdge>> {
        (**self).concept_edges(id, limit)
    }

    fn pair_edges(
        &self,
        node: &ConceptId,
        other: &ConceptId,
        limit: usize,
    ) -> FetchResult<Vec<RawEdge>> {
        (**self).pair_edges(node, other, limit)
    }
}

// ---------------------------------------------------------------------------
// ConceptNet HTTP client
// ---------------------------------------------------------------------------

/// Client for the ConceptNet REST API.
pub struct ConceptNetClient {
    base_url: String,
    language: String,
    http: ureq::Agent,
}

impl ConceptNetClient {
    pub fn new(config: &FactsConfig) -> Self {
        let http = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            http,
        }
    }

    /// `{base}/c/{lang}/{id}?limit={limit}`
    pub fn concept_url(&self, id: &ConceptId, limit: usize) -> String {
        format!("{}{}?limit={limit}", self.base_url, id.uri(&self.language))
    }

    /// `{base}/query?node=/c/{lang}/{a}&other=/c/{lang}/{b}&limit={limit}`
    pub fn pair_url(&self, node: &ConceptId, other: &ConceptId, limit: usize) -> String {
        format!(
            "{}/query?node={}&other={}&limit={limit}",
            self.base_url,
            node.uri(&self.language),
            other.uri(&self.language)
        )
    }

    fn get_edges(&self, url: &str) -> FetchResult<Vec<RawEdge>> {
        let _span = tracing::debug_span!("get_edges", %url).entered();

        match self.http.get(url).call() {
            Ok(response) => {
                let value: Value = response.into_json().map_err(|e| FetchError::Decode {
                    url: url.into(),
                    message: e.to_string(),
                })?;
                edges_from_value(url, value)
            }
            Err(ureq::Error::Status(status, response)) => {
                // The service reports unknown concepts as JSON error objects,
                // which simply carry no edges.
                let body = response.into_string().unwrap_or_default();
                match parse_edges(url, &body) {
                    Ok(edges) => {
                        warn!(%url, status, "service returned an error status");
                        Ok(edges)
                    }
                    Err(_) => Err(FetchError::Status {
                        url: url.into(),
                        status,
                    }),
                }
            }
            Err(ureq::Error::Transport(transport)) => Err(FetchError::Transport {
                url: url.into(),
                message: transport.to_string(),
            }),
        }
    }
}

impl EdgeSource for ConceptNetClient {
    fn concept_edges(&self, id: &ConceptId, limit: usize) -> FetchResult<Vec<RawEdge>> {
        self.get_edges(&self.concept_url(id, limit))
    }

    fn pair_edges(
        &self,
        node: &ConceptId,
        other: &ConceptId,
        limit: usize,
    ) -> FetchResult<Vec<RawEdge>> {
        self.get_edges(&self.pair_url(node, other, limit))
    }
}

/// Parse a response body into edge records.
///
/// The body must be a JSON object; its `"edges"` array may be absent.
pub fn parse_edges(url: &str, body: &str) -> FetchResult<Vec<RawEdge>> {
    let value: Value = serde_json::from_str(body).map_err(|e| FetchError::Decode {
        url: url.into(),
        message: e.to_string(),
    })?;
    edges_from_value(url, value)
}

fn edges_from_value(url: &str, value: Value) -> FetchResult<Vec<RawEdge>> {
    if !value.is_object() {
        return Err(FetchError::Shape { url: url.into() });
    }
    let response: EdgeResponse = serde_json::from_value(value).map_err(|e| FetchError::Decode {
        url: url.into(),
        message: e.to_string(),
    })?;
    Ok(response.into_edges())
}

// ---------------------------------------------------------------------------
// In-memory source
// ---------------------------------------------------------------------------

/// On-disk fixture layout for [`MemorySource::load`].
#[derive(Debug, Default, Deserialize)]
struct Fixture {
    #[serde(default)]
    concepts: HashMap<String, EdgeResponse>,
    #[serde(default)]
    pairs: Vec<PairFixture>,
}

#[derive(Debug, Deserialize)]
struct PairFixture {
    node: String,
    other: String,
    #[serde(flatten)]
    response: EdgeResponse,
}

/// Canned responses keyed by concept identifier.
///
/// Unknown concepts and pairs answer with no edges. Pair lookups match in
/// either order. Every lookup served is recorded.
#[derive(Debug, Default)]
pub struct MemorySource {
    concepts: HashMap<ConceptId, Vec<RawEdge>>,
    pairs: HashMap<(ConceptId, ConceptId), Vec<RawEdge>>,
    failing: Vec<ConceptId>,
    served: Mutex<Vec<Lookup>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edges returned for `concept`.
    pub fn with_concept(mut self, concept: &str, edges: Vec<RawEdge>) -> Self {
        self.concepts
            .entry(ConceptId::new(concept))
            .or_default()
            .extend(edges);
        self
    }

    /// Edges returned for the pair `(node, other)`, in either order.
    pub fn with_pair(mut self, node: &str, other: &str, edges: Vec<RawEdge>) -> Self {
        self.pairs
            .entry((ConceptId::new(node), ConceptId::new(other)))
            .or_default()
            .extend(edges);
        self
    }

    /// Any lookup involving `concept` fails with a transport error.
    pub fn failing_on(mut self, concept: &str) -> Self {
        self.failing.push(ConceptId::new(concept));
        self
    }

    /// Load a JSON fixture:
    ///
    /// ```json
    /// {
    ///   "concepts": { "dog": { "edges": [ ... ] } },
    ///   "pairs": [ { "node": "dog", "other": "park", "edges": [ ... ] } ]
    /// }
    /// ```
    pub fn load(path: &Path) -> FetchResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FetchError::FixtureRead {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&content).map_err(|e| FetchError::FixtureParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let fixture: Fixture = serde_json::from_str(json)?;
        let mut source = Self::new();
        for (concept, response) in fixture.concepts {
            source = source.with_concept(&concept, response.into_edges());
        }
        for pair in fixture.pairs {
            source = source.with_pair(&pair.node, &pair.other, pair.response.into_edges());
        }
        Ok(source)
    }

    /// Lookups served so far, in the order they arrived.
    pub fn served(&self) -> Vec<Lookup> {
        self.served
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Forget the lookups recorded so far.
    pub fn clear_served(&self) {
        self.served
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn record(&self, lookup: Lookup) {
        self.served
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(lookup);
    }

    fn check_failure(&self, ids: &[&ConceptId]) -> FetchResult<()> {
        match ids.iter().find(|&&id| self.failing.contains(id)) {
            Some(id) => Err(FetchError::Transport {
                url: format!("memory://{id}"),
                message: "connection refused".into(),
            }),
            None => Ok(()),
        }
    }
}

impl EdgeSource for MemorySource {
    fn concept_edges(&self, id: &ConceptId, limit: usize) -> FetchResult<Vec<RawEdge>> {
        self.record(Lookup::Concept {
            id: id.clone(),
            limit,
        });
        self.check_failure(&[id])?;
        Ok(self
            .concepts
            .get(id)
            .map(|edges| edges.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    fn pair_edges(
        &self,
        node: &ConceptId,
        other: &ConceptId,
        limit: usize,
    ) -> FetchResult<Vec<RawEdge>> {
        self.record(Lookup::Pair {
            node: node.clone(),
            other: other.clone(),
            limit,
        });
        self.check_failure(&[node, other])?;
        let edges = self
            .pairs
            .get(&(node.clone(), other.clone()))
            .or_else(|| self.pairs.get(&(other.clone(), node.clone())));
        Ok(edges
            .map(|edges| edges.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

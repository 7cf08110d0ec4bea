//! Typed records for ConceptNet edge responses.
//!
//! The remote JSON is loosely shaped: any field may be absent or carry the
//! wrong type. Every field here deserializes leniently, so a wrong-typed value
//! reads as missing instead of failing the whole response. Edges that end up
//! without a start label, relation label or end label cannot be rendered and
//! resolve to `None`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserialize a field, mapping any type mismatch to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Start or end node of an edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRef {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(
        rename = "@id",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
}

impl NodeRef {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            id: None,
        }
    }

    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            label: None,
            id: Some(id.into()),
        }
    }

    /// Readable label for this node.
    ///
    /// Prefers a non-empty `label`; otherwise takes the last path segment of
    /// `@id` with underscores turned into spaces.
    pub fn resolve_label(&self) -> Option<String> {
        let label = match self.label.as_deref().filter(|l| !l.is_empty()) {
            Some(label) => label.trim().to_string(),
            None => {
                let id = self.id.as_deref()?;
                let tail = id.rsplit('/').next().unwrap_or(id);
                tail.replace('_', " ").trim().to_string()
            }
        };
        (!label.is_empty()).then_some(label)
    }
}

/// Relation descriptor of an edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelRef {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One edge record as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub start: Option<NodeRef>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub rel: Option<RelRef>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub end: Option<NodeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,
}

impl RawEdge {
    /// Build a fully labelled edge.
    pub fn new(start: &str, relation: &str, end: &str, weight: f64) -> Self {
        Self {
            start: Some(NodeRef::labelled(start)),
            rel: Some(RelRef {
                label: Some(relation.to_string()),
            }),
            end: Some(NodeRef::labelled(end)),
            weight: Some(Value::from(weight)),
        }
    }

    /// Relation label, if present and non-empty.
    pub fn relation(&self) -> Option<&str> {
        self.rel
            .as_ref()
            .and_then(|r| r.label.as_deref())
            .filter(|l| !l.is_empty())
    }

    /// Edge weight, coerced to a finite number.
    ///
    /// Numbers and numeric strings are accepted; anything else is 0.0.
    pub fn weight(&self) -> f64 {
        let weight = match &self.weight {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            Some(Value::Bool(true)) => 1.0,
            _ => 0.0,
        };
        if weight.is_finite() { weight } else { 0.0 }
    }

    /// Resolve labels and weight, or `None` if any label is missing.
    pub fn resolve(&self) -> Option<Edge> {
        let start = self.start.as_ref()?.resolve_label()?;
        let relation = self.relation()?.to_string();
        let end = self.end.as_ref()?.resolve_label()?;
        Some(Edge {
            key: FactKey {
                start,
                relation,
                end,
            },
            weight: self.weight(),
        })
    }
}

/// Deduplication identity of an edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactKey {
    pub start: String,
    pub relation: String,
    pub end: String,
}

impl FactKey {
    pub fn new(start: &str, relation: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            relation: relation.to_string(),
            end: end.to_string(),
        }
    }
}

/// An edge with resolved labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub key: FactKey,
    pub weight: f64,
}

/// Body of an edge lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeResponse {
    #[serde(default, deserialize_with = "lenient")]
    edges: Option<Vec<Value>>,
}

impl EdgeResponse {
    /// Edge records of the response. Non-object entries are skipped.
    pub fn into_edges(self) -> Vec<RawEdge> {
        self.edges
            .unwrap_or_default()
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect()
    }
}

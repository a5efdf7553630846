use crate::error::{Error, Result};
use indexmap::IndexMap;
use nalgebra as na;
use rustc_hash::FxHashSet;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Opaque node identifier. Integer ids coming from JSON payloads are normalized to their
/// decimal string form.
pub type NodeId = String;

/// Open per-node classification fields (`entity_type`, `labels`, `properties`, ...).
pub type NodeAttributes = serde_json::Map<String, Value>;

/// Category used by partitioning layouts when a node carries no classification.
pub const DEFAULT_CATEGORY: &str = "default";

/// Every node id with its edge list, in caller order.
///
/// The shape matches the subgraph payload served by the knowledge-graph backend, so a
/// response body can be fed straight into [`Graph::from_json`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn add_node(&mut self, id: impl Into<NodeId>) -> &mut Node {
        self.nodes.push(Node::new(id));
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    pub fn add_edge(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) {
        self.edges.push(Edge::new(source, target));
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Rejects duplicate node ids and edges whose endpoints are not nodes of this graph.
    pub fn validate(&self) -> Result<()> {
        let mut node_exists: FxHashSet<&str> = FxHashSet::default();
        node_exists.reserve(self.nodes.len());
        for n in &self.nodes {
            if !node_exists.insert(n.id.as_str()) {
                return Err(Error::DuplicateNode { id: n.id.clone() });
            }
        }
        for e in &self.edges {
            if !node_exists.contains(e.source.as_str()) || !node_exists.contains(e.target.as_str())
            {
                return Err(Error::MissingEndpoint {
                    from: e.source.clone(),
                    to: e.target.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: NodeId,
    #[serde(flatten)]
    pub attributes: NodeAttributes,
}

impl Node {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            attributes: NodeAttributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Primary classification: `entity_type`, then the first of `labels`, then the compact
    /// payload's `type`, falling back to [`DEFAULT_CATEGORY`].
    pub fn category(&self) -> &str {
        fn non_empty(v: Option<&Value>) -> Option<&str> {
            v.and_then(Value::as_str).filter(|s| !s.is_empty())
        }

        non_empty(self.attributes.get("entity_type"))
            .or_else(|| {
                non_empty(
                    self.attributes
                        .get("labels")
                        .and_then(Value::as_array)
                        .and_then(|labels| labels.first()),
                )
            })
            .or_else(|| non_empty(self.attributes.get("type")))
            .unwrap_or(DEFAULT_CATEGORY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(deserialize_with = "deserialize_id")]
    pub source: NodeId,
    #[serde(deserialize_with = "deserialize_id")]
    pub target: NodeId,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            kind: None,
        }
    }
}

fn id_from_value(value: Value) -> std::result::Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        other => Err(format!("node id must be a string or an integer, got {other}")),
    }
}

pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<NodeId, D::Error>
where
    D: Deserializer<'de>,
{
    id_from_value(Value::deserialize(deserializer)?).map_err(D::Error::custom)
}

/// Like [`deserialize_id`] for optional fields; `null` reads as `None`.
pub(crate) fn deserialize_optional_id<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => id_from_value(value).map(Some).map_err(D::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Linear blend; `t = 0` yields `self`, `t = 1` yields `to`.
    pub fn lerp(self, to: Self, t: f64) -> Self {
        let a: na::Vector3<f64> = self.into();
        let b: na::Vector3<f64> = to.into();
        a.lerp(&b, t).into()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn distance(&self, other: &Self) -> f64 {
        let a: na::Vector3<f64> = (*self).into();
        let b: na::Vector3<f64> = (*other).into();
        (a - b).norm()
    }
}

impl From<Position> for na::Vector3<f64> {
    fn from(p: Position) -> Self {
        na::Vector3::new(p.x, p.y, p.z)
    }
}

impl From<na::Vector3<f64>> for Position {
    fn from(v: na::Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// One position per input node, in input order.
pub type PositionAssignment = IndexMap<NodeId, Position>;

//! Raw graph data as delivered by a [`GraphLoader`](crate::GraphLoader).
//!
//! Nothing here is trusted: coordinates may be missing, lengths may be
//! absent or nonsensical, and `maxspeed` arrives in whatever shape the map
//! provider produced.  [`normalize`](crate::normalize) turns a `RawGraph`
//! into a clean [`RoadNetwork`](crate::RoadNetwork).

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use rr_core::SourceNodeId;

// ── RawSpeed ──────────────────────────────────────────────────────────────────

/// A `maxspeed` value in any of the representations seen in map data.
///
/// | Variant  | Example              | Parsed as             |
/// |----------|----------------------|-----------------------|
/// | `Number` | `50`                 | 50                    |
/// | `List`   | `["40", "60"]`       | first element         |
/// | `Text`   | `"30 mph"`, `"50km/h"` | leading number, unit ignored |
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSpeed {
    Number(f64),
    List(Vec<RawSpeed>),
    Text(String),
}

impl RawSpeed {
    /// Best-effort parse to km/h.  `None` when nothing usable is present;
    /// only finite positive values are accepted.
    pub fn parse_kph(&self) -> Option<f64> {
        let value = match self {
            RawSpeed::Number(n) => Some(*n),
            RawSpeed::List(items) => items.first().and_then(RawSpeed::parse_kph),
            RawSpeed::Text(s) => leading_number(s),
        }?;
        (value.is_finite() && value > 0.0).then_some(value)
    }
}

/// Parse the numeric prefix of the first whitespace-separated token.
fn leading_number(s: &str) -> Option<f64> {
    let token = s.split_whitespace().next()?;
    let end = token
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_digit() || c == '.'))
        .map_or(token.len(), |(i, _)| i);
    token[..end].parse().ok()
}

// ── RawNode / RawEdge ─────────────────────────────────────────────────────────

/// A node as loaded: coordinates may be missing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id:  SourceNodeId,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl RawNode {
    pub fn new(id: i64, lat: f64, lon: f64) -> Self {
        Self { id: SourceNodeId(id), lat: Some(lat), lon: Some(lon) }
    }

    /// `true` if both coordinates are present and finite.
    pub fn has_coordinates(&self) -> bool {
        matches!((self.lat, self.lon), (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite())
    }
}

/// A directed edge as loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
    pub u: SourceNodeId,
    pub v: SourceNodeId,
    /// Length in metres.
    pub length_m: Option<f64>,
    /// Raw `maxspeed` tag.
    pub maxspeed: Option<RawSpeed>,
    /// Road classification (`highway=*` value).
    pub highway: Option<String>,
}

impl RawEdge {
    pub fn new(u: i64, v: i64, length_m: f64) -> Self {
        Self { u: SourceNodeId(u), v: SourceNodeId(v), length_m: Some(length_m), maxspeed: None, highway: None }
    }

    pub fn with_maxspeed(mut self, maxspeed: RawSpeed) -> Self {
        self.maxspeed = Some(maxspeed);
        self
    }

    pub fn with_highway(mut self, highway: &str) -> Self {
        self.highway = Some(highway.to_owned());
        self
    }

    /// The length if it is usable (finite and positive).
    pub fn valid_length_m(&self) -> Option<f64> {
        self.length_m.filter(|l| l.is_finite() && *l > 0.0)
    }

    /// `true` if `self` should replace `other` on an `(u, v)` clash:
    /// a usable length beats a missing one, and shorter beats longer.
    pub fn preferred_over(&self, other: &RawEdge) -> bool {
        match (self.valid_length_m(), other.valid_length_m()) {
            (Some(a), Some(b)) => a < b,
            (Some(_), None)    => true,
            _                  => false,
        }
    }
}

// ── RawGraph ──────────────────────────────────────────────────────────────────

/// Node and edge sets returned by one loader query.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGraph {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}

impl RawGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Union of two graphs by identity.
    ///
    /// Nodes are keyed by id; a node with coordinates replaces one without.
    /// Edges are keyed by `(u, v)`; on a clash the edge preferred by
    /// [`RawEdge::preferred_over`] wins.  Order of first appearance is kept.
    pub fn merge(self, other: RawGraph) -> RawGraph {
        let mut nodes: Vec<RawNode> = Vec::with_capacity(self.nodes.len() + other.nodes.len());
        let mut node_slot: FxHashMap<SourceNodeId, usize> = FxHashMap::default();
        for node in self.nodes.into_iter().chain(other.nodes) {
            match node_slot.entry(node.id) {
                Entry::Vacant(e) => {
                    e.insert(nodes.len());
                    nodes.push(node);
                }
                Entry::Occupied(e) => {
                    let existing = &mut nodes[*e.get()];
                    if !existing.has_coordinates() && node.has_coordinates() {
                        *existing = node;
                    }
                }
            }
        }

        RawGraph { nodes, edges: dedup_edges(self.edges.into_iter().chain(other.edges)) }
    }
}

/// Collapse edges sharing `(u, v)` to one, keeping the preferred edge in the
/// position of the first occurrence.
pub(crate) fn dedup_edges(edges: impl IntoIterator<Item = RawEdge>) -> Vec<RawEdge> {
    let mut out: Vec<RawEdge> = Vec::new();
    let mut slot: FxHashMap<(SourceNodeId, SourceNodeId), usize> = FxHashMap::default();
    for edge in edges {
        match slot.entry((edge.u, edge.v)) {
            Entry::Vacant(e) => {
                e.insert(out.len());
                out.push(edge);
            }
            Entry::Occupied(e) => {
                let existing = &mut out[*e.get()];
                if edge.preferred_over(existing) {
                    *existing = edge;
                }
            }
        }
    }
    out
}

//! A* shortest path over live edge weights.
//!
//! # Heuristic
//!
//! `h(n) = planar_distance(n, goal) / 1000`, the straight line between the
//! raw coordinate pairs scaled down by 1000.  On geographic coordinates this
//! is far below any real edge weight, so in practice the search behaves like
//! Dijkstra with a slight goal bias.  It is not guaranteed consistent, so a
//! node may be settled more than once: whenever a cheaper `g` is found the
//! node is pushed again and stale heap entries are skipped on pop.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rr_core::{EdgeId, NodeId};
use rr_network::{EdgeWeights, RoadNetwork};

use crate::{SearchError, SearchResult};

/// Divisor applied to the planar coordinate distance.
pub const HEURISTIC_SCALE: f64 = 1_000.0;

// ── Path ──────────────────────────────────────────────────────────────────────

/// A node sequence with the edges joining consecutive nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    /// `edges[i]` joins `nodes[i]` → `nodes[i + 1]`.
    pub edges: Vec<EdgeId>,
    /// Σ weight along `edges` under the weights the search ran on.
    pub cost:  f64,
}

impl Path {
    pub fn start(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn end(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }
}

// ── Heap key ──────────────────────────────────────────────────────────────────

/// Total order over `f64` costs so they can live in a `BinaryHeap`.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

#[inline]
fn heuristic(network: &RoadNetwork, node: NodeId, goal: NodeId) -> f64 {
    network.position(node).planar_distance(network.position(goal)) / HEURISTIC_SCALE
}

/// Cheapest path `from → to` under `weights`.
///
/// `from == to` yields the single-node path with cost 0.
///
/// # Errors
///
/// [`SearchError::NodeNotFound`] if either endpoint is outside `network`;
/// [`SearchError::NoPath`] if `to` is unreachable from `from`.
pub fn shortest_path(
    network: &RoadNetwork,
    weights: &EdgeWeights,
    from:    NodeId,
    to:      NodeId,
) -> SearchResult<Path> {
    for node in [from, to] {
        if !network.contains(node) {
            return Err(SearchError::NodeNotFound(node));
        }
    }
    if from == to {
        return Ok(Path { nodes: vec![from], edges: vec![], cost: 0.0 });
    }

    let n = network.node_count();
    // g[v] = best known cost to reach v.
    let mut g = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    g[from.index()] = 0.0;

    // Min-heap on (f, g, node).  NodeId breaks ties deterministically.
    let mut heap: BinaryHeap<Reverse<(Cost, Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(heuristic(network, from, to)), Cost(0.0), from)));

    while let Some(Reverse((_, Cost(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > g[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + weights.get(edge);

            if new_cost < g[neighbor.index()] {
                g[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                let f = new_cost + heuristic(network, neighbor, to);
                heap.push(Reverse((Cost(f), Cost(new_cost), neighbor)));
            }
        }
    }

    Err(SearchError::NoPath { from: network.source_id(from), to: network.source_id(to) })
}

fn reconstruct(
    network:   &RoadNetwork,
    prev_edge: &[EdgeId],
    from:      NodeId,
    to:        NodeId,
    cost:      f64,
) -> Path {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| network.edge_to[e.index()]));
    Path { nodes, edges, cost }
}

//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the `EdgeId` range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! A second CSR (`node_in_start` + `in_edges`) lists incoming edges so the
//! traffic layer can touch every edge incident to a node in O(degree).
//!
//! All per-edge arrays are sorted by source node and indexed by `EdgeId`.
//! The network itself is immutable once built: live, traffic-adjusted
//! weights live in [`EdgeWeights`](crate::EdgeWeights), not here.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  Used
//! to bind named locations to graph nodes.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use rr_core::{EdgeId, GeoPoint, NetworkKind, NodeId, SourceNodeId};

/// Speed limit assumed when the source data carries none (km/h).
pub const DEFAULT_SPEED_LIMIT_KPH: f64 = 40.0;

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Sufficient for
    /// nearest-node queries within a city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── EdgeAttrs ─────────────────────────────────────────────────────────────────

/// Normalised, immutable attributes of one directed edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeAttrs {
    /// Physical length in kilometres (> 0).
    pub base_distance_km: f64,
    /// Posted speed limit in km/h.
    pub speed_limit_kph: f64,
    /// Road-class preference multiplier (1.0 = preferred class).
    pub road_class_preference: f64,
}

impl EdgeAttrs {
    /// Attributes with the default speed limit and neutral preference.
    pub fn new(base_distance_km: f64) -> Self {
        Self {
            base_distance_km,
            speed_limit_kph: DEFAULT_SPEED_LIMIT_KPH,
            road_class_preference: 1.0,
        }
    }

    pub fn with_speed_limit(mut self, speed_limit_kph: f64) -> Self {
        self.speed_limit_kph = speed_limit_kph;
        self
    }

    pub fn with_preference(mut self, road_class_preference: f64) -> Self {
        self.road_class_preference = road_class_preference;
        self
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus a spatial index for node binding.
///
/// All per-node and per-edge arrays are `pub` for direct indexed access on
/// hot paths.  Do not construct directly; use [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    /// Which graph this is (drivable or walkable).
    pub kind: NetworkKind,

    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// Loader-assigned identifier of each node.  Indexed by `NodeId`.
    pub node_source: Vec<SourceNodeId>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Incoming edges of node `n` are `in_edges[node_in_start[n] .. node_in_start[n+1]]`.
    pub node_in_start: Vec<u32>,

    /// Edge ids grouped by destination node.
    pub in_edges: Vec<EdgeId>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Normalised attributes of each edge.
    pub edge_attrs: Vec<EdgeAttrs>,

    // ── Lookup structures ─────────────────────────────────────────────────
    source_idx:  FxHashMap<SourceNodeId, NodeId>,
    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    ///
    /// Any routing request against an empty network fails with no path.
    pub fn empty(kind: NetworkKind) -> Self {
        RoadNetworkBuilder::new(kind).build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range; no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Iterator over the `EdgeId`s of all incoming edges to `node`.
    #[inline]
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_in_start[node.index()] as usize;
        let end   = self.node_in_start[node.index() + 1] as usize;
        self.in_edges[start..end].iter().copied()
    }

    /// Every edge with `node` as either endpoint (outgoing first).
    pub fn incident_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(node).chain(self.in_edges(node))
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// In-degree of `node` (number of incoming edges).
    #[inline]
    pub fn in_degree(&self, node: NodeId) -> usize {
        let start = self.node_in_start[node.index()] as usize;
        let end   = self.node_in_start[node.index() + 1] as usize;
        end - start
    }

    /// Total number of edges touching `node`.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.out_degree(node) + self.in_degree(node)
    }

    /// The directed edge `from → to`, if present.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.out_edges(from).find(|e| self.edge_to[e.index()] == to)
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Identity & geometry ───────────────────────────────────────────────

    /// Dense id of the node the loader called `source`.
    pub fn node_by_source(&self, source: SourceNodeId) -> Option<NodeId> {
        self.source_idx.get(&source).copied()
    }

    #[inline]
    pub fn source_id(&self, node: NodeId) -> SourceNodeId {
        self.node_source[node.index()]
    }

    #[inline]
    pub fn position(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    #[inline]
    pub fn attrs(&self, edge: EdgeId) -> &EdgeAttrs {
        &self.edge_attrs[edge.index()]
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest node to `pos`.
    ///
    /// Returns `None` only if the network has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

impl std::fmt::Debug for RoadNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadNetwork")
            .field("kind", &self.kind)
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order.  `build()`
/// sorts edges by source node, constructs both CSR arrays, and bulk-loads
/// the R-tree.
///
/// # Example
///
/// ```
/// use rr_core::{GeoPoint, NetworkKind, SourceNodeId};
/// use rr_network::{EdgeAttrs, RoadNetworkBuilder};
///
/// let mut b = RoadNetworkBuilder::new(NetworkKind::Drive);
/// let a = b.add_node(SourceNodeId(1), GeoPoint::new(-3.79, 102.26));
/// let c = b.add_node(SourceNodeId(2), GeoPoint::new(-3.80, 102.27));
/// b.add_road(a, c, EdgeAttrs::new(1.2));
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    kind:      NetworkKind,
    nodes:     Vec<GeoPoint>,
    sources:   Vec<SourceNodeId>,
    raw_edges: Vec<PendingEdge>,
}

struct PendingEdge {
    from:  NodeId,
    to:    NodeId,
    attrs: EdgeAttrs,
}

impl RoadNetworkBuilder {
    pub fn new(kind: NetworkKind) -> Self {
        Self { kind, nodes: Vec::new(), sources: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(kind: NetworkKind, nodes: usize, edges: usize) -> Self {
        Self {
            kind,
            nodes:     Vec::with_capacity(nodes),
            sources:   Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, source: SourceNodeId, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.sources.push(source);
        id
    }

    /// Add a **directed** edge from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, attrs: EdgeAttrs) {
        self.raw_edges.push(PendingEdge { from, to, attrs });
    }

    /// Convenience: add edges in **both directions** with identical attributes.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs) {
        self.add_directed_edge(a, b, attrs);
        self.add_directed_edge(b, a, attrs);
    }

    /// Look up the position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for edge sort + O(N log N) for R-tree bulk
    /// load, where N = nodes, E = edges.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable sort keeps insertion order among a node's outgoing edges.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:  Vec<NodeId>    = raw.iter().map(|e| e.from).collect();
        let edge_to:    Vec<NodeId>    = raw.iter().map(|e| e.to).collect();
        let edge_attrs: Vec<EdgeAttrs> = raw.iter().map(|e| e.attrs).collect();

        // Outgoing CSR row pointer.
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Incoming CSR: count, prefix-sum, then scatter edge ids.
        let mut node_in_start = vec![0u32; node_count + 1];
        for to in &edge_to {
            node_in_start[to.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_in_start[i] += node_in_start[i - 1];
        }
        let mut cursor: Vec<u32> = node_in_start[..node_count].to_vec();
        let mut in_edges = vec![EdgeId::INVALID; edge_count];
        for (i, to) in edge_to.iter().enumerate() {
            let slot = &mut cursor[to.index()];
            in_edges[*slot as usize] = EdgeId(i as u32);
            *slot += 1;
        }

        let source_idx: FxHashMap<SourceNodeId, NodeId> = self
            .sources
            .iter()
            .enumerate()
            .map(|(i, &s)| (s, NodeId(i as u32)))
            .collect();

        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.lat, pos.lon],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            kind: self.kind,
            node_pos: self.nodes,
            node_source: self.sources,
            node_out_start,
            node_in_start,
            in_edges,
            edge_from,
            edge_to,
            edge_attrs,
            source_idx,
            spatial_idx,
        }
    }
}

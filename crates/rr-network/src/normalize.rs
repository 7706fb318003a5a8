//! Raw graph cleanup: coordinate purge, attribute derivation, CSR build.
//!
//! | Attribute               | Derivation                                             |
//! |-------------------------|--------------------------------------------------------|
//! | `base_distance_km`      | `length_m / 1000`; missing/invalid length → 1000 m     |
//! | `speed_limit_kph`       | [`RawSpeed::parse_kph`]; unparsable/absent → 40        |
//! | `road_class_preference` | [`road_class_preference`] per network kind             |
//!
//! Initial search weights equal `base_distance_km`
//! (see [`EdgeWeights::from_base`](crate::EdgeWeights::from_base)).

use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use rr_core::{GeoPoint, NetworkKind, NodeId, SourceNodeId};

use crate::network::{DEFAULT_SPEED_LIMIT_KPH, EdgeAttrs, RoadNetwork, RoadNetworkBuilder};
use crate::raw::{RawGraph, dedup_edges};

/// Length assumed for edges whose source length is missing or invalid.
pub const DEFAULT_LENGTH_M: f64 = 1_000.0;

/// Preference for road classes outside the preferred set, drivable network.
pub const DRIVE_OTHER_PREFERENCE: f64 = 1.5;

/// Preference for road classes outside the preferred set, walkable network.
pub const WALK_OTHER_PREFERENCE: f64 = 1.2;

/// Road-class preference multiplier.
///
/// | Kind    | Preferred (1.0)                            | Other |
/// |---------|--------------------------------------------|-------|
/// | `Drive` | `primary`, `secondary`, `tertiary`         | 1.5   |
/// | `Walk`  | `path`, `footway`, `steps`, `residential`  | 1.2   |
pub fn road_class_preference(kind: NetworkKind, highway: Option<&str>) -> f64 {
    match kind {
        NetworkKind::Drive => match highway {
            Some("primary" | "secondary" | "tertiary") => 1.0,
            _ => DRIVE_OTHER_PREFERENCE,
        },
        NetworkKind::Walk => match highway {
            Some("path" | "footway" | "steps" | "residential") => 1.0,
            _ => WALK_OTHER_PREFERENCE,
        },
    }
}

/// Turn a raw loader graph into a clean [`RoadNetwork`].
///
/// Nodes lacking either coordinate are purged (count logged at `info`), and
/// edges referencing purged or unknown nodes are dropped with them.  Edges
/// sharing `(u, v)` collapse to one.  Per-edge data-quality problems are
/// recovered with defaults and logged at `warn`.
pub fn normalize(raw: RawGraph, kind: NetworkKind) -> RoadNetwork {
    let RawGraph { nodes, edges } = raw;

    let total_nodes = nodes.len();
    let mut builder = RoadNetworkBuilder::with_capacity(kind, total_nodes, edges.len());
    let mut ids: FxHashMap<SourceNodeId, NodeId> = FxHashMap::default();

    for node in nodes {
        if ids.contains_key(&node.id) {
            continue;
        }
        if let (Some(lat), Some(lon)) = (node.lat, node.lon) {
            let pos = GeoPoint::new(lat, lon);
            if pos.is_valid() {
                ids.insert(node.id, builder.add_node(node.id, pos));
            }
        }
    }
    info!(
        "removed {} nodes without coordinates from {kind} network",
        total_nodes - builder.node_count()
    );

    let mut dropped_edges = 0usize;
    for edge in dedup_edges(edges) {
        let (Some(&from), Some(&to)) = (ids.get(&edge.u), ids.get(&edge.v)) else {
            dropped_edges += 1;
            continue;
        };

        let length_m = edge.valid_length_m().unwrap_or_else(|| {
            warn!(
                "invalid length for edge ({}, {}): {:?}, using default {DEFAULT_LENGTH_M} m",
                edge.u, edge.v, edge.length_m
            );
            DEFAULT_LENGTH_M
        });

        let speed_limit_kph = match &edge.maxspeed {
            None => DEFAULT_SPEED_LIMIT_KPH,
            Some(raw_speed) => raw_speed.parse_kph().unwrap_or_else(|| {
                warn!(
                    "unparsable maxspeed {raw_speed:?} on edge ({}, {}), using default {DEFAULT_SPEED_LIMIT_KPH} km/h",
                    edge.u, edge.v
                );
                DEFAULT_SPEED_LIMIT_KPH
            }),
        };

        let attrs = EdgeAttrs::new(length_m / 1_000.0)
            .with_speed_limit(speed_limit_kph)
            .with_preference(road_class_preference(kind, edge.highway.as_deref()));
        builder.add_directed_edge(from, to, attrs);
    }
    if dropped_edges > 0 {
        debug!("dropped {dropped_edges} {kind} edges referencing missing nodes");
    }

    let network = builder.build();
    info!(
        "{kind} graph: {} nodes, {} edges",
        network.node_count(),
        network.edge_count()
    );
    network
}

//! Serializable form of a normalised [`RoadNetwork`], used by the graph cache.
//!
//! The record stores nodes in `NodeId` order and edges as dense indices into
//! that list, so rebuilding reproduces the same ids.  The R-tree and the
//! source-id lookup are derived data and are rebuilt on load.

use serde::{Deserialize, Serialize};

use rr_core::{GeoPoint, NetworkKind, NodeId, SourceNodeId};

use crate::{EdgeAttrs, NetworkError, NetworkResult, RoadNetwork, RoadNetworkBuilder};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub source: SourceNodeId,
    pub pos:    GeoPoint,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from:                  u32,
    pub to:                    u32,
    pub base_distance_km:      f64,
    pub speed_limit_kph:       f64,
    pub road_class_preference: f64,
}

/// A whole network as plain data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub kind:  NetworkKind,
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl NetworkRecord {
    pub fn from_network(network: &RoadNetwork) -> Self {
        let nodes = network
            .node_source
            .iter()
            .zip(&network.node_pos)
            .map(|(&source, &pos)| NodeRecord { source, pos })
            .collect();

        let edges = (0..network.edge_count())
            .map(|i| {
                let attrs = &network.edge_attrs[i];
                EdgeRecord {
                    from:                  network.edge_from[i].0,
                    to:                    network.edge_to[i].0,
                    base_distance_km:      attrs.base_distance_km,
                    speed_limit_kph:       attrs.speed_limit_kph,
                    road_class_preference: attrs.road_class_preference,
                }
            })
            .collect();

        Self { kind: network.kind, nodes, edges }
    }

    /// Rebuild the network.
    ///
    /// # Errors
    ///
    /// [`NetworkError::Record`] if an edge references a node outside the
    /// record, a node position is not finite, or an edge attribute is not a
    /// finite positive number.
    pub fn into_network(self) -> NetworkResult<RoadNetwork> {
        let mut builder = RoadNetworkBuilder::with_capacity(self.kind, self.nodes.len(), self.edges.len());
        for node in self.nodes {
            if !node.pos.is_valid() {
                return Err(NetworkError::Record(format!("node {} has invalid position", node.source)));
            }
            builder.add_node(node.source, node.pos);
        }

        let node_count = builder.node_count();
        for (i, edge) in self.edges.into_iter().enumerate() {
            if edge.from as usize >= node_count || edge.to as usize >= node_count {
                return Err(NetworkError::Record(format!(
                    "edge {i} references node outside 0..{node_count}"
                )));
            }
            let usable = |v: f64| v.is_finite() && v > 0.0;
            if !(usable(edge.base_distance_km) && usable(edge.speed_limit_kph) && usable(edge.road_class_preference)) {
                return Err(NetworkError::Record(format!("edge {i} has invalid attributes")));
            }
            builder.add_directed_edge(
                NodeId(edge.from),
                NodeId(edge.to),
                EdgeAttrs::new(edge.base_distance_km)
                    .with_speed_limit(edge.speed_limit_kph)
                    .with_preference(edge.road_class_preference),
            );
        }

        Ok(builder.build())
    }
}

impl From<&RoadNetwork> for NetworkRecord {
    fn from(network: &RoadNetwork) -> Self {
        Self::from_network(network)
    }
}

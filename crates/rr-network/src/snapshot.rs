//! Live edge weights and immutable network versions.
//!
//! A [`RoadNetwork`] never changes after it is built.  What changes is the
//! per-edge `weight` that search reads: traffic updates produce a new
//! [`EdgeWeights`] vector, wrap it in a new [`NetworkSnapshot`], and publish
//! that snapshot.  Readers that checked out an older snapshot keep using it
//! until they finish, so no search ever observes a half-applied update.

use std::ops::Index;
use std::sync::Arc;

use rr_core::EdgeId;

use crate::RoadNetwork;

// ── EdgeWeights ───────────────────────────────────────────────────────────────

/// Search cost of every edge, indexed by `EdgeId`.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeWeights(Vec<f64>);

impl EdgeWeights {
    /// Initial weights: `weight = base_distance_km` for every edge.
    pub fn from_base(network: &RoadNetwork) -> Self {
        Self(network.edge_attrs.iter().map(|a| a.base_distance_km).collect())
    }

    #[inline]
    pub fn get(&self, edge: EdgeId) -> f64 {
        self.0[edge.index()]
    }

    /// Overwrite the weight of `edge`.
    #[inline]
    pub fn set(&mut self, edge: EdgeId, weight: f64) {
        self.0[edge.index()] = weight;
    }

    /// Multiply the weight of `edge` by `factor`.
    #[inline]
    pub fn scale(&mut self, edge: EdgeId, factor: f64) {
        self.0[edge.index()] *= factor;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl Index<EdgeId> for EdgeWeights {
    type Output = f64;

    #[inline]
    fn index(&self, edge: EdgeId) -> &f64 {
        &self.0[edge.index()]
    }
}

// ── NetworkSnapshot ───────────────────────────────────────────────────────────

/// One consistent version of a weighted graph.
#[derive(Clone, Debug)]
pub struct NetworkSnapshot {
    /// Shared, immutable topology and base attributes.
    pub network: Arc<RoadNetwork>,
    /// Live weights for this version.
    pub weights: EdgeWeights,
    /// Monotonic counter of traffic updates folded into `weights`
    /// (0 = base weights only).
    pub traffic_version: u64,
}

impl NetworkSnapshot {
    /// Version 0: base weights, no traffic applied.
    pub fn new(network: Arc<RoadNetwork>) -> Self {
        let weights = EdgeWeights::from_base(&network);
        Self { network, weights, traffic_version: 0 }
    }

    /// Successor snapshot sharing this topology with new weights.
    pub fn with_weights(&self, weights: EdgeWeights, traffic_version: u64) -> Self {
        debug_assert_eq!(weights.len(), self.network.edge_count());
        Self { network: Arc::clone(&self.network), weights, traffic_version }
    }
}

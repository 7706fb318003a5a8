//! Graph loader capability and the two-strategy load procedure.
//!
//! # Strategy
//!
//! ```text
//! load_area(name) ──ok──▶ load_point_radius(center, r) ──ok──▶ merge(area, point)
//!        │                        └──err──▶ area alone
//!        └──err──▶ load_point_radius(center, r) ──ok──▶ point alone
//!                                 └──err──▶ NetworkError::GraphLoad
//! ```
//!
//! A query that succeeds but returns no nodes counts as a failure.

use std::collections::HashMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use rr_core::{GeoPoint, NetworkKind};

use crate::{NetworkError, NetworkResult, RawGraph, RoadNetwork, normalize};

/// Fallback query centre used when the named-area query is unavailable.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint { lat: -3.8000, lon: 102.2667 };

/// Fallback query radius in metres.
pub const DEFAULT_RADIUS_M: f64 = 15_000.0;

// ── GraphLoader ───────────────────────────────────────────────────────────────

/// External source of raw street-graph data.
///
/// Implementations perform blocking I/O and must be `Send + Sync` so one
/// loader can serve both network kinds from worker threads.
pub trait GraphLoader: Send + Sync {
    /// Graph for a named geographic area (e.g. `"Bengkulu, Indonesia"`).
    fn load_area(&self, area: &str, kind: NetworkKind) -> NetworkResult<RawGraph>;

    /// Graph within `radius_m` metres of `center`.
    fn load_point_radius(
        &self,
        center:   GeoPoint,
        radius_m: f64,
        kind:     NetworkKind,
    ) -> NetworkResult<RawGraph>;
}

// ── AreaQuery ─────────────────────────────────────────────────────────────────

/// Parameters of the named-area query and its point-radius fallback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaQuery {
    pub area_name:         String,
    pub fallback_center:   GeoPoint,
    pub fallback_radius_m: f64,
}

impl Default for AreaQuery {
    fn default() -> Self {
        Self {
            area_name:         "Bengkulu, Indonesia".to_owned(),
            fallback_center:   DEFAULT_CENTER,
            fallback_radius_m: DEFAULT_RADIUS_M,
        }
    }
}

// ── Load procedure ────────────────────────────────────────────────────────────

/// Run the area-then-point strategy and return the raw (un-normalised) graph.
///
/// # Errors
///
/// [`NetworkError::GraphLoad`] when neither strategy yields a non-empty graph.
pub fn load_raw_graph(
    loader: &dyn GraphLoader,
    query:  &AreaQuery,
    kind:   NetworkKind,
) -> NetworkResult<RawGraph> {
    let point = |loader: &dyn GraphLoader| {
        non_empty(loader.load_point_radius(query.fallback_center, query.fallback_radius_m, kind))
    };

    match non_empty(loader.load_area(&query.area_name, kind)) {
        Ok(area) => {
            info!(
                "loaded {kind} graph for {:?}: {} nodes, {} edges",
                query.area_name,
                area.nodes.len(),
                area.edges.len()
            );
            match point(loader) {
                Ok(detail) => {
                    let merged = area.merge(detail);
                    info!(
                        "merged {kind} graph with {:.0} m radius query: {} nodes, {} edges",
                        query.fallback_radius_m,
                        merged.nodes.len(),
                        merged.edges.len()
                    );
                    Ok(merged)
                }
                Err(e) => {
                    warn!("{kind} point-radius query failed ({e}); using area graph alone");
                    Ok(area)
                }
            }
        }
        Err(area_err) => {
            warn!(
                "{kind} area query for {:?} failed ({area_err}); falling back to point-radius query",
                query.area_name
            );
            let detail = point(loader).map_err(|point_err| NetworkError::GraphLoad {
                kind,
                reason: format!("area query: {area_err}; point-radius query: {point_err}"),
            })?;
            info!(
                "loaded {kind} graph around {} within {:.0} m: {} nodes, {} edges",
                query.fallback_center,
                query.fallback_radius_m,
                detail.nodes.len(),
                detail.edges.len()
            );
            Ok(detail)
        }
    }
}

/// Load and normalise one network kind.
pub fn load_network(
    loader: &dyn GraphLoader,
    query:  &AreaQuery,
    kind:   NetworkKind,
) -> NetworkResult<RoadNetwork> {
    let raw = load_raw_graph(loader, query, kind)?;
    Ok(normalize(raw, kind))
}

fn non_empty(result: NetworkResult<RawGraph>) -> NetworkResult<RawGraph> {
    match result {
        Ok(graph) if graph.is_empty() => Err(NetworkError::Loader("query returned no nodes".to_owned())),
        other => other,
    }
}

// ── MemoryGraphLoader ─────────────────────────────────────────────────────────

/// A [`GraphLoader`] serving pre-built raw graphs from memory.
///
/// Areas are registered by name; point-radius queries return the registered
/// fallback graph for the kind regardless of centre and radius.  Anything not
/// registered fails like an unavailable provider would.
#[derive(Default)]
pub struct MemoryGraphLoader {
    areas:    HashMap<(String, NetworkKind), RawGraph>,
    fallback: HashMap<NetworkKind, RawGraph>,
}

impl MemoryGraphLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_area(mut self, area: &str, kind: NetworkKind, graph: RawGraph) -> Self {
        self.areas.insert((area.to_owned(), kind), graph);
        self
    }

    pub fn with_point_radius(mut self, kind: NetworkKind, graph: RawGraph) -> Self {
        self.fallback.insert(kind, graph);
        self
    }
}

impl GraphLoader for MemoryGraphLoader {
    fn load_area(&self, area: &str, kind: NetworkKind) -> NetworkResult<RawGraph> {
        self.areas
            .get(&(area.to_owned(), kind))
            .cloned()
            .ok_or_else(|| NetworkError::Loader(format!("no {kind} data for area {area:?}")))
    }

    fn load_point_radius(
        &self,
        center:    GeoPoint,
        _radius_m: f64,
        kind:      NetworkKind,
    ) -> NetworkResult<RawGraph> {
        self.fallback
            .get(&kind)
            .cloned()
            .ok_or_else(|| NetworkError::Loader(format!("no {kind} data around {center}")))
    }
}

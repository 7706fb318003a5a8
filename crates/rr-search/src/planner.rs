//! The full search pipeline for one request: primary path, alternatives,
//! metrics, coordinate floor, ordering.

use log::{debug, warn};

use rr_core::{DepartureTime, NodeId, TravelMode};
use rr_network::NetworkSnapshot;
use rr_traffic::CongestionLevel;

use crate::alternatives::k_alternatives;
use crate::astar::{Path, shortest_path};
use crate::metrics::path_metrics;
use crate::route::{Route, RouteSet};
use crate::SearchResult;

/// Routes must have at least this many coordinates to be emitted.
pub const MIN_ROUTE_POINTS: usize = 2;

/// Parameters of one route request, already resolved to graph nodes.
#[derive(Clone, Debug)]
pub struct RouteQuery<'a> {
    pub start_location:   &'a str,
    pub end_location:     &'a str,
    pub from:             NodeId,
    pub to:               NodeId,
    pub mode:             TravelMode,
    /// Total routes requested, primary included.
    pub max_alternatives: usize,
    pub departure:        Option<DepartureTime>,
}

/// Run the pipeline on one consistent network version.
///
/// `max_alternatives == 0` asks for no routes and yields an empty set
/// without searching.
///
/// # Errors
///
/// [`SearchError::NoPath`](crate::SearchError::NoPath) when the endpoints
/// are disconnected; the caller turns this into an empty route set.
pub fn plan_routes(
    snapshot:      &NetworkSnapshot,
    query:         &RouteQuery<'_>,
    network_level: CongestionLevel,
) -> SearchResult<RouteSet> {
    if query.max_alternatives == 0 {
        debug!("{} -> {} ({}): zero routes requested", query.start_location, query.end_location, query.mode);
        return Ok(RouteSet::empty());
    }

    let network = snapshot.network.as_ref();
    let weights = &snapshot.weights;

    let base = shortest_path(network, weights, query.from, query.to)?;
    let alternatives = k_alternatives(network, weights, &base, query.to, query.max_alternatives);
    debug!(
        "{} -> {} ({}): primary path {} nodes, {} alternatives",
        query.start_location,
        query.end_location,
        query.mode,
        base.nodes.len(),
        alternatives.len()
    );

    let routes: Vec<Route> = std::iter::once(base)
        .chain(alternatives)
        .enumerate()
        .filter_map(|(i, path)| build_route(snapshot, query, network_level, i + 1, &path))
        .collect();

    Ok(RouteSet::from_routes(routes))
}

fn build_route(
    snapshot:      &NetworkSnapshot,
    query:         &RouteQuery<'_>,
    network_level: CongestionLevel,
    route_index:   usize,
    path:          &Path,
) -> Option<Route> {
    let network = snapshot.network.as_ref();
    let coordinates: Vec<_> = path
        .nodes
        .iter()
        .map(|&n| network.position(n))
        .filter(|p| p.is_valid())
        .collect();
    if coordinates.len() < MIN_ROUTE_POINTS {
        warn!(
            "route {route_index} {} -> {} has {} coordinate(s); discarded",
            query.start_location,
            query.end_location,
            coordinates.len()
        );
        return None;
    }

    let metrics = path_metrics(
        network,
        &snapshot.weights,
        &path.nodes,
        query.mode,
        query.departure,
        network_level,
    );

    Some(Route {
        route_index,
        path: path.nodes.iter().map(|&n| network.source_id(n)).collect(),
        coordinates,
        total_distance_km: metrics.distance_km,
        estimated_time_min: metrics.time_min,
        congestion_level: metrics.congestion_level,
        route_quality: metrics.quality,
        start_location: query.start_location.to_owned(),
        end_location: query.end_location.to_owned(),
        mode: query.mode,
    })
}

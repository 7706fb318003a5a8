//! Distance, travel time, and congestion labels for a path.
//!
//! | Metric       | Computation                                                       |
//! |--------------|-------------------------------------------------------------------|
//! | distance km  | Σ `weight` over the path's edges                                  |
//! | time min     | Σ `weight / effective_speed × 60`, × historical (rush-hour) factor |
//! | congestion   | network-wide level from the traffic state; walking always `Low`   |
//! | quality      | from congestion: Low → Good, Moderate → Moderate, else Poor       |
//!
//! Distance is read from the live weights, so under traffic it is a cost
//! in "effective kilometres" rather than a physical length.

use log::warn;

use rr_core::{DepartureTime, NodeId, TravelMode, historical_factor};
use rr_network::{EdgeWeights, RoadNetwork};
use rr_traffic::CongestionLevel;

use crate::route::RouteQuality;

/// Metrics of one path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathMetrics {
    pub distance_km:      f64,
    pub time_min:         f64,
    pub congestion_level: CongestionLevel,
    pub quality:          RouteQuality,
}

/// Congestion reported for `mode` when the network-wide level is `network_level`.
pub fn mode_congestion(mode: TravelMode, network_level: CongestionLevel) -> CongestionLevel {
    match mode {
        TravelMode::Walking => CongestionLevel::Low,
        TravelMode::Car | TravelMode::Motorcycle => network_level,
    }
}

/// Evaluate `path` (a node sequence of `network`) under `weights`.
///
/// Consecutive node pairs without a joining edge are skipped and logged.
pub fn path_metrics(
    network:       &RoadNetwork,
    weights:       &EdgeWeights,
    path:          &[NodeId],
    mode:          TravelMode,
    departure:     Option<DepartureTime>,
    network_level: CongestionLevel,
) -> PathMetrics {
    let mut distance_km = 0.0;
    let mut hours = 0.0;
    for pair in path.windows(2) {
        let Some(edge) = network.find_edge(pair[0], pair[1]) else {
            warn!(
                "no {} edge {} -> {}; skipped in route metrics",
                network.kind,
                network.source_id(pair[0]),
                network.source_id(pair[1])
            );
            continue;
        };
        let weight = weights.get(edge);
        distance_km += weight;
        hours += weight / mode.effective_speed_kph(network.attrs(edge).speed_limit_kph);
    }

    let congestion_level = mode_congestion(mode, network_level);
    PathMetrics {
        distance_km,
        time_min: hours * 60.0 * historical_factor(departure),
        congestion_level,
        quality: RouteQuality::from_congestion(congestion_level),
    }
}

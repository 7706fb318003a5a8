//! Edge re-weighting from a traffic snapshot.
//!
//! ```text
//! weight = base_distance_km
//!        × (1 + congestion_ratio)
//!        × max(0.5, speed_limit_kph / max(avg_speed_kph, 5))
//!        × (1 + weather_intensity × 0.1)
//!        × road_class_preference
//! ```
//!
//! Every row overwrites the weight of each edge incident to its location's
//! node.  Rows are applied in snapshot order, so an edge touched by several
//! rows ends with the value from the last one.  Edges no row touches keep
//! whatever weight they had.

use log::{debug, info};

use rr_network::{EdgeAttrs, EdgeWeights, LocationBindings, NetworkSnapshot, RoadNetwork};

use crate::row::TrafficRow;

/// Lower bound of the speed factor.
pub const SPEED_FACTOR_FLOOR: f64 = 0.5;

/// Observed speeds below this are treated as this (km/h).
pub const AVG_SPEED_FLOOR_KPH: f64 = 5.0;

/// Weight increase per unit of weather intensity.
pub const WEATHER_COEFFICIENT: f64 = 0.1;

/// `max(0.5, speed_limit / max(avg_speed, 5))`
#[inline]
pub fn speed_factor(speed_limit_kph: f64, avg_speed_kph: f64) -> f64 {
    (speed_limit_kph / avg_speed_kph.max(AVG_SPEED_FLOOR_KPH)).max(SPEED_FACTOR_FLOOR)
}

/// `1 + intensity × 0.1`
#[inline]
pub fn weather_factor(weather_intensity: f64) -> f64 {
    1.0 + weather_intensity * WEATHER_COEFFICIENT
}

/// Traffic-adjusted weight of one edge under one row.
pub fn edge_weight(attrs: &EdgeAttrs, row: &TrafficRow) -> f64 {
    attrs.base_distance_km
        * (1.0 + row.congestion_ratio)
        * speed_factor(attrs.speed_limit_kph, row.avg_speed_kph)
        * weather_factor(row.weather_intensity)
        * attrs.road_class_preference
}

/// Overwrite `weights` for every edge touching a bound row location.
///
/// Returns the number of edge writes performed.  Rows whose location has no
/// binding in `bindings` are skipped.
pub fn apply(
    network:  &RoadNetwork,
    weights:  &mut EdgeWeights,
    rows:     &[TrafficRow],
    bindings: &LocationBindings,
) -> usize {
    let mut writes = 0usize;
    for row in rows {
        let Some(node) = bindings.node(&row.location) else {
            debug!("traffic row for unbound location {:?} skipped", row.location);
            continue;
        };
        for edge in network.incident_edges(node) {
            weights.set(edge, edge_weight(network.attrs(edge), row));
            writes += 1;
        }
    }
    writes
}

/// Copy-on-write update: a successor of `current` with `rows` applied on top
/// of its weights, stamped with `traffic_version`.
pub fn reweigh(
    current:         &NetworkSnapshot,
    rows:            &[TrafficRow],
    bindings:        &LocationBindings,
    traffic_version: u64,
) -> NetworkSnapshot {
    let mut weights = current.weights.clone();
    let writes = apply(&current.network, &mut weights, rows, bindings);
    info!(
        "{} network re-weighted from {} rows ({writes} edge writes), traffic version {traffic_version}",
        current.network.kind,
        rows.len()
    );
    current.with_weights(weights, traffic_version)
}

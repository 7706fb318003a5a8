//! Unit tests for rr-traffic.

#[cfg(test)]
mod helpers {
    use rr_core::{GeoPoint, NetworkKind, NodeId, SourceNodeId};
    use rr_network::{
        EdgeAttrs, Location, LocationBindings, LocationRegistry, RoadNetwork, RoadNetworkBuilder,
    };

    /// A-B-C-D-E along the equator, 1 km bidirectional roads, 40 km/h.
    /// B-C has road-class preference 1.5; the others 1.0.
    pub fn line() -> (RoadNetwork, [NodeId; 5]) {
        let mut b = RoadNetworkBuilder::new(NetworkKind::Drive);
        let n: Vec<NodeId> = (0..5)
            .map(|i| b.add_node(SourceNodeId(i), GeoPoint::new(0.0, i as f64 * 0.01)))
            .collect();
        for i in 0..4 {
            let pref = if i == 1 { 1.5 } else { 1.0 };
            b.add_road(n[i], n[i + 1], EdgeAttrs::new(1.0).with_preference(pref));
        }
        (b.build(), [n[0], n[1], n[2], n[3], n[4]])
    }

    pub fn bindings(net: &RoadNetwork) -> LocationBindings {
        let registry = LocationRegistry::from_locations(
            ["A", "B", "C", "D", "E"]
                .iter()
                .enumerate()
                .map(|(i, name)| Location::new(*name, 0.0, i as f64 * 0.01)),
        )
        .unwrap();
        LocationBindings::bind_all(net, &registry, 16)
    }
}

// ── Weight formula ────────────────────────────────────────────────────────────

#[cfg(test)]
mod formula {
    use rr_network::EdgeAttrs;

    use crate::{TrafficRow, edge_weight, speed_factor, weather_factor};

    #[test]
    fn speed_factor_floors() {
        assert_eq!(speed_factor(40.0, 20.0), 2.0);
        // Fast traffic cannot push the factor below 0.5.
        assert_eq!(speed_factor(40.0, 200.0), 0.5);
        // Crawling traffic is treated as 5 km/h.
        assert_eq!(speed_factor(40.0, 1.0), 8.0);
    }

    #[test]
    fn weather() {
        assert_eq!(weather_factor(0.0), 1.0);
        assert!((weather_factor(1.0) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn free_flow_is_base_times_preference() {
        let attrs = EdgeAttrs::new(2.0).with_speed_limit(50.0).with_preference(1.5);
        let row = TrafficRow::new("X", 0.0, 50.0);
        assert_eq!(edge_weight(&attrs, &row), 3.0);
    }
}

// ── apply ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod apply {
    use rr_network::EdgeWeights;

    use crate::{TrafficRow, apply};

    #[test]
    fn congested_row_scenario() {
        let (net, [_, b, c, _, _]) = super::helpers::line();
        let bindings = super::helpers::bindings(&net);
        let mut weights = EdgeWeights::from_base(&net);

        let rows = [TrafficRow::new("B", 0.5, 20.0)];
        apply(&net, &mut weights, &rows, &bindings);

        // 1.0 × (1 + 0.5) × max(0.5, 40/20) × 1.0 × 1.5
        let bc = net.find_edge(b, c).unwrap();
        assert_eq!(weights[bc], 4.5);
        assert_eq!(weights[net.find_edge(c, b).unwrap()], 4.5);
    }

    #[test]
    fn touches_both_directions_of_incident_edges_only() {
        let (net, [a, b, c, d, e]) = super::helpers::line();
        let bindings = super::helpers::bindings(&net);
        let mut weights = EdgeWeights::from_base(&net);

        let writes = apply(&net, &mut weights, &[TrafficRow::new("B", 0.5, 20.0)], &bindings);
        assert_eq!(writes, net.degree(b));
        // A-B: 1.0 × 1.5 × 2.0 × 1.0 × 1.0
        assert_eq!(weights[net.find_edge(a, b).unwrap()], 3.0);
        assert_eq!(weights[net.find_edge(b, a).unwrap()], 3.0);
        assert_eq!(weights[net.find_edge(c, d).unwrap()], 1.0);
        assert_eq!(weights[net.find_edge(d, e).unwrap()], 1.0);
    }

    #[test]
    fn neutral_traffic_restores_base_times_preference() {
        let (net, nodes) = super::helpers::line();
        let bindings = super::helpers::bindings(&net);
        let mut weights = EdgeWeights::from_base(&net);

        let rows: Vec<TrafficRow> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|l| TrafficRow::new(*l, 0.0, 40.0))
            .collect();
        apply(&net, &mut weights, &rows, &bindings);

        for n in nodes {
            for e in net.incident_edges(n) {
                let attrs = net.attrs(e);
                assert_eq!(weights[e], attrs.base_distance_km * attrs.road_class_preference);
            }
        }
    }

    #[test]
    fn last_row_wins_and_is_not_cumulative() {
        let (net, [_, b, c, _, _]) = super::helpers::line();
        let bindings = super::helpers::bindings(&net);
        let mut weights = EdgeWeights::from_base(&net);
        let bc = net.find_edge(b, c).unwrap();

        let rows = [TrafficRow::new("B", 0.5, 20.0), TrafficRow::new("C", 0.0, 40.0)];
        apply(&net, &mut weights, &rows, &bindings);
        assert_eq!(weights[bc], 1.5);

        // Re-applying the same rows gives the same result, not a compounded one.
        apply(&net, &mut weights, &rows, &bindings);
        assert_eq!(weights[bc], 1.5);
    }

    #[test]
    fn unbound_location_is_skipped() {
        let (net, _) = super::helpers::line();
        let bindings = super::helpers::bindings(&net);
        let mut weights = EdgeWeights::from_base(&net);
        let before = weights.clone();

        let writes = apply(&net, &mut weights, &[TrafficRow::new("Nowhere", 0.9, 5.0)], &bindings);
        assert_eq!(writes, 0);
        assert_eq!(weights, before);
    }
}

// ── Copy-on-write update ──────────────────────────────────────────────────────

#[cfg(test)]
mod reweigh {
    use std::sync::Arc;

    use rr_network::NetworkSnapshot;

    use crate::{TrafficRow, reweigh};

    #[test]
    fn produces_new_version_and_leaves_old_untouched() {
        let (net, [_, b, c, _, _]) = super::helpers::line();
        let bindings = super::helpers::bindings(&net);
        let bc = net.find_edge(b, c).unwrap();
        let v0 = NetworkSnapshot::new(Arc::new(net));

        let v1 = reweigh(&v0, &[TrafficRow::new("B", 0.5, 20.0)], &bindings, 1);
        assert_eq!(v1.traffic_version, 1);
        assert_eq!(v1.weights[bc], 4.5);
        assert_eq!(v0.weights[bc], 1.0);
        assert!(Arc::ptr_eq(&v0.network, &v1.network));
    }
}

// ── Snapshot CSV ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{TrafficError, load_snapshot_reader, weather_intensity};

    #[test]
    fn full_columns() {
        let csv = "location,congestion_ratio,avg_speed,weather_intensity,weather\n\
                   Pasar Minggu,0.62,18.5,,Light Rain\n\
                   Simpang Lima,0.35,31.0,0.2,Rain\n\
                   Unib,0.10,45.0,,\n";
        let snap = load_snapshot_reader(Cursor::new(csv)).unwrap();
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.rows[0].weather_intensity, 1.0);
        // Explicit intensity wins over the description.
        assert_eq!(snap.rows[1].weather_intensity, 0.2);
        assert_eq!(snap.rows[2].weather_intensity, 0.0);
        assert_eq!(snap.rows[0].avg_speed_kph, 18.5);
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let csv = "location,congestion_ratio,avg_speed\nUnib,0.5,30\n";
        let snap = load_snapshot_reader(Cursor::new(csv)).unwrap();
        assert_eq!(snap.rows[0].weather_intensity, 0.0);
        assert_eq!(snap.rows[0].congestion_ratio, 0.5);
    }

    #[test]
    fn ratio_is_clamped() {
        let csv = "location,congestion_ratio,avg_speed\nA,1.4,30\nB,-0.2,30\n";
        let snap = load_snapshot_reader(Cursor::new(csv)).unwrap();
        assert_eq!(snap.rows[0].congestion_ratio, 1.0);
        assert_eq!(snap.rows[1].congestion_ratio, 0.0);
    }

    #[test]
    fn non_positive_speed_is_rejected() {
        let csv = "location,congestion_ratio,avg_speed\nA,0.4,0\n";
        let err = load_snapshot_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, TrafficError::InvalidRow { .. }));
    }

    #[test]
    fn weather_descriptions() {
        assert_eq!(weather_intensity("Rain"), 1.0);
        assert_eq!(weather_intensity("thunderstorm with rain"), 1.0);
        assert_eq!(weather_intensity("Clouds"), 0.5);
        assert_eq!(weather_intensity("Clear"), 0.0);
    }
}

// ── Aggregate state ───────────────────────────────────────────────────────────

#[cfg(test)]
mod state {
    use crate::{CongestionLevel, TrafficRow, TrafficSnapshot, TrafficState};

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(CongestionLevel::from_mean(None), CongestionLevel::Unknown);
        assert_eq!(CongestionLevel::from_mean(Some(0.71)), CongestionLevel::High);
        assert_eq!(CongestionLevel::from_mean(Some(0.7)), CongestionLevel::Moderate);
        assert_eq!(CongestionLevel::from_mean(Some(0.41)), CongestionLevel::Moderate);
        assert_eq!(CongestionLevel::from_mean(Some(0.4)), CongestionLevel::Low);
    }

    #[test]
    fn advance_tracks_mean_of_latest_snapshot() {
        let state = TrafficState::default();
        assert_eq!(state.congestion_level(), CongestionLevel::Unknown);

        let snap: TrafficSnapshot = [TrafficRow::new("A", 0.9, 10.0), TrafficRow::new("B", 0.7, 10.0)]
            .into_iter()
            .collect();
        let state = state.advance(&snap);
        assert_eq!(state.version, 1);
        assert_eq!(state.congestion_level(), CongestionLevel::High);

        let state = state.advance(&TrafficSnapshot::default());
        assert_eq!(state.version, 2);
        assert_eq!(state.congestion_level(), CongestionLevel::Unknown);
    }
}

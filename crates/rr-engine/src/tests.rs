//! Unit tests for rr-engine.
//!
//! The test city is a five-node main road with a bypass, plus a separate
//! two-node island:
//!
//! ```text
//!            F(6)
//!          /      \
//!   A(1)--B(2)--C(3)--D(4)--E(5)          G(7)--H(8)
//! ```
//!
//! Main road edges are 1 km, the bypass edges 1.1 km.

#[cfg(test)]
mod helpers {
    use std::path::Path;
    use std::sync::Arc;

    use rr_cache::{KvStore, StalenessPolicy};
    use rr_core::NetworkKind;
    use rr_network::{Location, LocationRegistry, MemoryGraphLoader, RawEdge, RawGraph, RawNode};

    use crate::{EngineBuilder, EngineConfig, RouteEngine};

    pub const AREA: &str = "Bengkulu, Indonesia";

    fn road(edges: &mut Vec<RawEdge>, u: i64, v: i64, length_m: f64, highway: &str) {
        edges.push(RawEdge::new(u, v, length_m).with_highway(highway));
        edges.push(RawEdge::new(v, u, length_m).with_highway(highway));
    }

    pub fn city(highway: &str) -> RawGraph {
        let nodes = vec![
            RawNode::new(1, -3.790, 102.260),
            RawNode::new(2, -3.790, 102.270),
            RawNode::new(3, -3.790, 102.280),
            RawNode::new(4, -3.790, 102.290),
            RawNode::new(5, -3.790, 102.300),
            RawNode::new(6, -3.780, 102.280),
            RawNode::new(7, -3.700, 102.400),
            RawNode::new(8, -3.700, 102.410),
        ];
        let mut edges = Vec::new();
        road(&mut edges, 1, 2, 1000.0, highway);
        road(&mut edges, 2, 3, 1000.0, highway);
        road(&mut edges, 3, 4, 1000.0, highway);
        road(&mut edges, 4, 5, 1000.0, highway);
        road(&mut edges, 2, 6, 1100.0, highway);
        road(&mut edges, 6, 4, 1100.0, highway);
        road(&mut edges, 7, 8, 1000.0, highway);
        RawGraph { nodes, edges }
    }

    pub fn loader() -> MemoryGraphLoader {
        MemoryGraphLoader::new()
            .with_area(AREA, NetworkKind::Drive, city("primary"))
            .with_area(AREA, NetworkKind::Walk, city("footway"))
    }

    pub fn registry() -> LocationRegistry {
        LocationRegistry::from_locations([
            Location::new("Pasar Minggu", -3.790, 102.260),
            Location::new("Unib", -3.7901, 102.2801),
            Location::new("Simpang Lima", -3.790, 102.300),
            Location::new("Pulau Baai", -3.700, 102.410),
        ])
        .unwrap()
    }

    pub fn config(map_dir: &Path, policy: StalenessPolicy) -> EngineConfig {
        EngineConfig {
            route_cache_policy: policy,
            map_output_dir: map_dir.to_path_buf(),
            ..EngineConfig::default()
        }
    }

    pub fn engine(map_dir: &Path, policy: StalenessPolicy) -> RouteEngine {
        match EngineBuilder::new(config(map_dir, policy), registry()).loader(loader()).build() {
            Ok(engine) => engine,
            Err(e) => panic!("engine build failed: {e}"),
        }
    }

    pub fn engine_with_store(store: Arc<dyn KvStore>, loader: MemoryGraphLoader) -> RouteEngine {
        let dir = std::env::temp_dir();
        match EngineBuilder::new(config(&dir, StalenessPolicy::Never), registry())
            .loader(loader)
            .store(store)
            .build()
        {
            Ok(engine) => engine,
            Err(e) => panic!("engine build failed: {e}"),
        }
    }

    pub fn ids(route: &rr_search::Route) -> Vec<i64> {
        route.path.iter().map(|id| id.0).collect()
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use rr_cache::StalenessPolicy;

    use crate::{EngineConfig, EngineError};

    #[test]
    fn empty_document_is_default() {
        assert_eq!(EngineConfig::from_json_str("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.area_name, "Bengkulu, Indonesia");
        assert_eq!(c.fallback_radius_m, 15_000.0);
        assert_eq!(c.fallback_center.lat, -3.8);
        assert_eq!(c.bind_search_k, 16);
        assert_eq!(c.route_cache_policy, StalenessPolicy::Never);
        assert_eq!(c.default_max_alternatives, 5);
        assert_eq!(c.default_min_alternatives, 3);
        assert_eq!(c.map_output_dir, std::path::PathBuf::from("maps"));
    }

    #[test]
    fn partial_override() {
        let c = EngineConfig::from_json_str(
            r#"{ "area_name": "Curup", "route_cache_policy": { "ttl": { "secs": 900 } } }"#,
        )
        .unwrap();
        assert_eq!(c.area_name, "Curup");
        assert_eq!(c.route_cache_policy, StalenessPolicy::Ttl { secs: 900 });
        assert_eq!(c.bind_search_k, 16);
        assert_eq!(c.area_query().area_name, "Curup");
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "fallback_radius_m": -1.0 }"#),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "bind_search_k": 0 }"#),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(EngineConfig::from_json_str("not json"), Err(EngineError::Json(_))));
    }

    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{ "default_max_alternatives": 2 }"#).unwrap();
        assert_eq!(EngineConfig::from_json_file(&path).unwrap().default_max_alternatives, 2);
    }
}

// ── Build ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod build {
    use rr_cache::StalenessPolicy;
    use rr_core::{NetworkKind, SourceNodeId};
    use rr_network::{MemoryGraphLoader, NetworkError};

    use crate::{EngineBuilder, EngineConfig, EngineError, RouteEngine};

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RouteEngine>();
    }

    #[test]
    fn binds_every_location_on_both_networks() {
        let dir = tempfile::tempdir().unwrap();
        let engine = super::helpers::engine(dir.path(), StalenessPolicy::Never);

        for kind in [NetworkKind::Drive, NetworkKind::Walk] {
            assert_eq!(engine.location_node("Pasar Minggu", kind), Some(SourceNodeId(1)));
            assert_eq!(engine.location_node("Unib", kind), Some(SourceNodeId(3)));
            assert_eq!(engine.location_node("Pulau Baai", kind), Some(SourceNodeId(8)));
            assert_eq!(engine.location_node("Nowhere", kind), None);
        }
        assert_eq!(engine.locations().len(), 4);
        assert_eq!(engine.snapshot(NetworkKind::Walk).network.kind, NetworkKind::Walk);
        assert_eq!(engine.traffic_state().version, 0);
    }

    #[test]
    fn missing_loader_is_a_config_error() {
        let result = EngineBuilder::new(EngineConfig::default(), super::helpers::registry()).build();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn unavailable_graph_is_fatal() {
        let result = EngineBuilder::new(EngineConfig::default(), super::helpers::registry())
            .loader(MemoryGraphLoader::new())
            .build();
        assert!(matches!(result, Err(EngineError::Network(NetworkError::GraphLoad { .. }))));
    }

    #[test]
    fn point_radius_fallback_is_used() {
        use rr_core::NetworkKind::{Drive, Walk};
        let loader = MemoryGraphLoader::new()
            .with_point_radius(Drive, super::helpers::city("primary"))
            .with_point_radius(Walk, super::helpers::city("footway"));
        let result = EngineBuilder::new(EngineConfig::default(), super::helpers::registry())
            .loader(loader)
            .build();
        assert!(result.is_ok());
    }
}

// ── Graph cache ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod graph_cache {
    use std::sync::Arc;

    use rr_cache::{DirStore, KvStore};
    use rr_core::NetworkKind;
    use rr_network::MemoryGraphLoader;

    use crate::{graph_key, load_cached_network};

    use super::helpers::{AREA, engine_with_store, loader};

    #[test]
    fn key_format() {
        assert_eq!(graph_key("Bengkulu, Indonesia", NetworkKind::Walk), "graph_Bengkulu, Indonesia_walk");
    }

    #[test]
    fn second_build_is_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DirStore::open(dir.path()).unwrap());

        let first = engine_with_store(store.clone(), loader());
        assert!(load_cached_network(store.as_ref(), AREA, NetworkKind::Drive).is_some());
        assert!(load_cached_network(store.as_ref(), AREA, NetworkKind::Walk).is_some());

        // A loader with no data would fail; the cache makes it unnecessary.
        let second = engine_with_store(store.clone(), MemoryGraphLoader::new());
        for kind in [NetworkKind::Drive, NetworkKind::Walk] {
            let a = first.snapshot(kind);
            let b = second.snapshot(kind);
            assert_eq!(a.network.node_count(), b.network.node_count());
            assert_eq!(a.network.edge_count(), b.network.edge_count());
            assert_eq!(a.network.kind, b.network.kind);
        }
    }

    #[test]
    fn corrupt_entry_is_reloaded_and_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DirStore::open(dir.path()).unwrap());
        let key = graph_key(AREA, NetworkKind::Drive);
        store.put(&key, b"{\"kind\":\"road_network\",\"format_version\":1,").unwrap();
        assert!(load_cached_network(store.as_ref(), AREA, NetworkKind::Drive).is_none());

        let engine = engine_with_store(store.clone(), loader());
        assert_eq!(engine.snapshot(NetworkKind::Drive).network.node_count(), 8);
        assert!(load_cached_network(store.as_ref(), AREA, NetworkKind::Drive).is_some());
    }

    #[test]
    fn entry_of_the_wrong_kind_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DirStore::open(dir.path()).unwrap());
        let _ = engine_with_store(store.clone(), loader());

        let walk = store.get(&graph_key(AREA, NetworkKind::Walk)).unwrap().unwrap();
        store.put(&graph_key(AREA, NetworkKind::Drive), &walk).unwrap();
        assert!(load_cached_network(store.as_ref(), AREA, NetworkKind::Drive).is_none());
    }
}

// ── Routes ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routes {
    use rr_cache::StalenessPolicy;
    use rr_core::{DepartureTime, NetworkKind, TravelMode};
    use rr_search::{CongestionLevel, RouteQuality, SearchError};

    use rr_network::{Location, LocationRegistry};

    use crate::{EngineBuilder, EngineError};

    use super::helpers::{engine, ids};

    #[test]
    fn primary_and_bypass_alternative() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);

        let routes =
            engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, 2, 1, None);
        assert_eq!(routes.len(), 2);

        let primary = &routes.routes()[0];
        assert_eq!(ids(primary), vec![1, 2, 3, 4, 5]);
        assert_eq!(primary.route_index, 1);
        assert!((primary.total_distance_km - 4.0).abs() < 1e-9);
        assert!((primary.estimated_time_min - 6.0).abs() < 1e-9);
        assert_eq!(primary.congestion_level, CongestionLevel::Unknown);
        assert_eq!(primary.route_quality, RouteQuality::Poor);
        assert_eq!(primary.coordinates.len(), 5);

        let bypass = &routes.routes()[1];
        assert_eq!(ids(bypass), vec![1, 2, 6, 4, 5]);
        assert!((bypass.total_distance_km - 4.2).abs() < 1e-9);
    }

    #[test]
    fn max_one_returns_primary_only() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);
        let routes =
            engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, 1, 1, None);
        assert_eq!(routes.len(), 1);
    }

    #[test]
    fn max_zero_returns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);
        let routes =
            engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, 0, 0, None);
        assert!(routes.is_empty());

        let routes =
            engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, 1, 1, None);
        assert_eq!(routes.len(), 1);
    }

    #[test]
    fn underscored_names_are_cached_separately() {
        let dir = tempfile::tempdir().unwrap();
        let registry = LocationRegistry::from_locations([
            Location::new("A_B", -3.790, 102.260),
            Location::new("B_C", -3.7901, 102.2601),
            Location::new("C", -3.790, 102.300),
            Location::new("A", -3.7901, 102.3001),
        ])
        .unwrap();
        let engine = EngineBuilder::new(super::helpers::config(dir.path(), StalenessPolicy::Never), registry)
            .loader(super::helpers::loader())
            .build()
            .unwrap();

        let forward = engine.get_alternative_routes("A_B", "C", TravelMode::Car, 2, 1, None);
        assert_eq!(ids(&forward.routes()[0]), vec![1, 2, 3, 4, 5]);

        let backward = engine.get_alternative_routes("A", "B_C", TravelMode::Car, 2, 1, None);
        let best = backward.best().unwrap();
        assert_eq!(best.start_location, "A");
        assert_eq!(best.end_location, "B_C");
        assert_eq!(ids(best), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn alternatives_are_distinct_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);
        let routes =
            engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Motorcycle, 3, 1, None);

        let list = routes.routes();
        for (i, a) in list.iter().enumerate() {
            for b in &list[i + 1..] {
                assert_ne!(a.path, b.path);
            }
        }
        for pair in list.windows(2) {
            assert!(pair[0].total_distance_km <= pair[1].total_distance_km);
            if pair[0].total_distance_km == pair[1].total_distance_km {
                assert!(pair[0].estimated_time_min <= pair[1].estimated_time_min);
            }
        }
    }

    #[test]
    fn repeated_request_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);
        let first = engine.get_alternative_routes("Pasar Minggu", "Unib", TravelMode::Car, 3, 1, None);
        let second = engine.get_alternative_routes("Pasar Minggu", "Unib", TravelMode::Car, 3, 1, None);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn disconnected_endpoints_yield_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);

        let routes = engine.get_alternative_routes("Pasar Minggu", "Pulau Baai", TravelMode::Car, 3, 1, None);
        assert!(routes.is_empty());

        let err = engine
            .try_get_alternative_routes("Pasar Minggu", "Pulau Baai", TravelMode::Car, 3, 1, None)
            .unwrap_err();
        assert!(matches!(err, EngineError::Search(SearchError::NoPath { .. })));
    }

    #[test]
    fn unknown_location_yields_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);

        assert!(engine.get_alternative_routes("Nowhere", "Unib", TravelMode::Walking, 3, 1, None).is_empty());

        let err = engine
            .try_get_alternative_routes("Unib", "Nowhere", TravelMode::Walking, 3, 1, None)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnboundLocation { ref name, kind: NetworkKind::Walk } if name == "Nowhere"
        ));
    }

    #[test]
    fn same_start_and_end_yields_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);
        assert!(engine.get_alternative_routes("Unib", "Unib", TravelMode::Car, 3, 1, None).is_empty());
    }

    #[test]
    fn too_few_alternatives_only_warns() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);
        let routes = engine
            .try_get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, 5, 5, None)
            .unwrap();
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn departure_in_rush_hour_slows_the_route() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);
        let rush = DepartureTime::parse("2024-06-03 08:15:00").unwrap();
        let routes =
            engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, 1, 1, Some(rush));
        assert!((routes.routes()[0].estimated_time_min - 9.0).abs() < 1e-9);
    }

    #[test]
    fn defaults_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);
        let routes = engine.get_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, None);
        assert_eq!(routes.len(), 2);
    }
}

// ── Traffic ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod traffic {
    use std::sync::Arc;

    use rr_cache::{MemoryStore, ROUTE_SET_KIND, RouteKey, StalenessPolicy, get_record};
    use rr_core::{NetworkKind, SourceNodeId, TravelMode};
    use rr_search::{CongestionLevel, RouteQuality, RouteSet};
    use rr_traffic::{TrafficRow, TrafficSnapshot};

    use crate::EngineBuilder;

    use super::helpers::{engine, ids};

    fn jam_at_unib(ratio: f64) -> TrafficSnapshot {
        TrafficSnapshot::new(vec![TrafficRow::new("Unib", ratio, 20.0)])
    }

    fn drive_weight(engine: &crate::RouteEngine, u: i64, v: i64) -> f64 {
        let snapshot = engine.snapshot(NetworkKind::Drive);
        let net = &snapshot.network;
        let from = net.node_by_source(SourceNodeId(u)).unwrap();
        let to = net.node_by_source(SourceNodeId(v)).unwrap();
        snapshot.weights[net.find_edge(from, to).unwrap()]
    }

    #[test]
    fn update_reweights_incident_drive_edges_only() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);
        let walk_before = engine.snapshot(NetworkKind::Walk);

        engine.update_traffic_conditions(&jam_at_unib(0.5));

        // 1.0 km × 1.5 × max(0.5, 40/20) × 1.0 × 1.0
        for (u, v) in [(2, 3), (3, 2), (3, 4), (4, 3)] {
            assert!((drive_weight(&engine, u, v) - 3.0).abs() < 1e-9);
        }
        assert_eq!(drive_weight(&engine, 1, 2), 1.0);

        let walk_after = engine.snapshot(NetworkKind::Walk);
        assert_eq!(walk_before.weights, walk_after.weights);
        assert_eq!(walk_after.traffic_version, 0);

        let state = engine.traffic_state();
        assert_eq!(state.version, 1);
        assert_eq!(state.congestion_level(), CongestionLevel::Moderate);
        assert_eq!(engine.snapshot(NetworkKind::Drive).traffic_version, 1);
    }

    #[test]
    fn readers_keep_their_checked_out_version() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);
        let before = engine.snapshot(NetworkKind::Drive);
        engine.update_traffic_conditions(&jam_at_unib(0.9));
        let after = engine.snapshot(NetworkKind::Drive);

        assert_eq!(before.traffic_version, 0);
        assert_ne!(before.weights, after.weights);
        assert!(std::sync::Arc::ptr_eq(&before.network, &after.network));
    }

    #[test]
    fn version_policy_routes_around_the_jam() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::TrafficVersion);
        let before = engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, 1, 1, None);
        assert_eq!(ids(&before.routes()[0]), vec![1, 2, 3, 4, 5]);

        engine.update_traffic_conditions(&jam_at_unib(0.5));
        let after = engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, 1, 1, None);
        let primary = &after.routes()[0];
        assert_eq!(ids(primary), vec![1, 2, 6, 4, 5]);
        assert_eq!(primary.congestion_level, CongestionLevel::Moderate);
        assert_eq!(primary.route_quality, RouteQuality::Moderate);
    }

    #[test]
    fn never_policy_serves_cached_routes_after_update() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);
        let before = engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, 1, 1, None);
        engine.update_traffic_conditions(&jam_at_unib(0.5));
        let after = engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, 1, 1, None);
        assert_eq!(before, after);
    }

    #[test]
    fn walking_is_reported_low_under_heavy_traffic() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::TrafficVersion);
        engine.update_traffic_conditions(&jam_at_unib(0.9));
        assert_eq!(engine.traffic_state().congestion_level(), CongestionLevel::High);

        let routes = engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Walking, 2, 1, None);
        assert!(!routes.is_empty());
        for route in &routes {
            assert_eq!(route.congestion_level, CongestionLevel::Low);
            assert_eq!(route.route_quality, RouteQuality::Good);
        }
    }

    #[test]
    fn walking_routes_do_not_age_with_traffic() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let engine = EngineBuilder::new(
            super::helpers::config(dir.path(), StalenessPolicy::TrafficVersion),
            super::helpers::registry(),
        )
        .loader(super::helpers::loader())
        .store(store.clone())
        .build()
        .unwrap();

        let stamp = |mode: TravelMode| {
            let key = RouteKey::new("Pasar Minggu", "Simpang Lima", 2, mode).storage_key();
            get_record::<RouteSet>(store.as_ref(), &key, ROUTE_SET_KIND)
                .unwrap()
                .map(|entry| entry.traffic_version)
        };

        let before = engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Walking, 2, 1, None);
        engine.update_traffic_conditions(&jam_at_unib(0.9));
        engine.update_traffic_conditions(&jam_at_unib(0.5));
        let after = engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Walking, 2, 1, None);
        engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, 2, 1, None);

        assert!(!before.is_empty());
        assert_eq!(before, after);
        assert_eq!(stamp(TravelMode::Walking), Some(0));
        assert_eq!(stamp(TravelMode::Car), Some(2));
    }

    #[test]
    fn concurrent_requests_during_updates() {
        use std::thread;

        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(engine(dir.path(), StalenessPolicy::TrafficVersion));

        let readers: Vec<_> = (0..4)
            .map(|i| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    for _ in 0..20 {
                        let routes = engine.get_alternative_routes(
                            "Pasar Minggu",
                            "Simpang Lima",
                            TravelMode::Car,
                            1 + i % 3,
                            1,
                            None,
                        );
                        assert!(!routes.is_empty());
                        for pair in routes.routes().windows(2) {
                            assert!(pair[0].total_distance_km <= pair[1].total_distance_km);
                        }
                    }
                })
            })
            .collect();

        let writer = {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for step in 0..10 {
                    engine.update_traffic_conditions(&jam_at_unib(step as f64 / 10.0));
                }
            })
        };

        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(engine.traffic_state().version, 10);
        assert_eq!(engine.snapshot(NetworkKind::Drive).traffic_version, 10);
    }
}

// ── Maps ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod maps {
    use rr_cache::StalenessPolicy;
    use rr_core::TravelMode;

    use super::helpers::engine;

    #[test]
    fn create_route_map_writes_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);
        let routes = engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, 2, 1, None);

        let path = engine.create_route_map(&routes.routes()[0], "primary.geojson", 1).unwrap();
        assert!(path.is_file());
        assert_eq!(path.parent().unwrap(), dir.path().canonicalize().unwrap());
    }

    #[test]
    fn one_map_per_route() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);
        let routes = engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, 2, 1, None);

        let paths = engine.create_route_maps(&routes);
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("route_pasar-minggu_simpang-lima_car_1.geojson"));
        assert!(paths[1].ends_with("route_pasar-minggu_simpang-lima_car_2.geojson"));
    }

    #[test]
    fn degenerate_route_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path(), StalenessPolicy::Never);
        let routes = engine.get_alternative_routes("Pasar Minggu", "Simpang Lima", TravelMode::Car, 1, 1, None);

        let mut route = routes.routes()[0].clone();
        route.coordinates.truncate(1);
        assert!(engine.create_route_map(&route, "bad.geojson", 1).is_none());
        assert!(!dir.path().join("bad.geojson").exists());
    }
}

//! Unit tests for rr-cache.

#[cfg(test)]
mod helpers {
    use rr_core::{GeoPoint, SourceNodeId, TravelMode};
    use rr_search::{Route, RouteQuality, RouteSet};
    use rr_traffic::CongestionLevel;

    pub fn routes(distance: f64) -> RouteSet {
        RouteSet::from_routes(vec![Route {
            route_index:        1,
            path:               vec![SourceNodeId(1), SourceNodeId(2)],
            coordinates:        vec![GeoPoint::new(-3.7952, 102.2664), GeoPoint::new(-3.7972, 102.2659)],
            total_distance_km:  distance,
            estimated_time_min: distance * 1.5,
            congestion_level:   CongestionLevel::Moderate,
            route_quality:      RouteQuality::Moderate,
            start_location:     "Pasar Minggu".into(),
            end_location:       "Simpang Lima".into(),
            mode:               TravelMode::Car,
        }])
    }
}

// ── Stores ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stores {
    use crate::store::file_stem;
    use crate::{DirStore, KvStore, MemoryStore};

    fn exercise(store: &dyn KvStore) {
        assert_eq!(store.get("a").unwrap(), None);
        store.put("a", b"one").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some(&b"one"[..]));
        store.put("a", b"two").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some(&b"two"[..]));
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        store.remove("a").unwrap();
    }

    #[test]
    fn memory_store() {
        let store = MemoryStore::new();
        exercise(&store);
        assert!(store.is_empty());
    }

    #[test]
    fn dir_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::open(dir.path().join("cache")).unwrap();
        exercise(&store);

        store.put("routes_Pasar Minggu_Unib_3_car", b"x").unwrap();
        assert!(store.path_for("routes_Pasar Minggu_Unib_3_car").is_file());
    }

    #[test]
    fn file_stems_are_safe_and_distinct() {
        assert_eq!(file_stem("abc-1.2"), "abc-1.2");
        assert_eq!(file_stem("a b"), "a_20b");
        assert_eq!(file_stem("a/b"), "a_2fb");
        assert_ne!(file_stem("a_b"), file_stem("a b"));
        assert!(!file_stem("../etc").contains('/'));
        assert!(!file_stem(".hidden").starts_with('.'));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = crate::SqliteStore::open(dir.path()).unwrap();
        exercise(&store);
        assert!(dir.path().join("cache.db").exists());
    }
}

// ── Envelope ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod envelope {
    use crate::{CacheError, Envelope, FORMAT_VERSION, MemoryStore, KvStore, get_record, put_record};

    #[test]
    fn record_roundtrip() {
        let store = MemoryStore::new();
        put_record(&store, "k", "numbers", 7, &vec![1.5_f64, 2.25]).unwrap();
        let env: Envelope<Vec<f64>> = get_record(&store, "k", "numbers").unwrap().unwrap();
        assert_eq!(env.payload, vec![1.5, 2.25]);
        assert_eq!(env.traffic_version, 7);
        assert_eq!(env.format_version, FORMAT_VERSION);
        assert_eq!(env.kind, "numbers");
    }

    #[test]
    fn absent_key_is_none() {
        let store = MemoryStore::new();
        assert!(get_record::<u32>(&store, "missing", "n").unwrap().is_none());
    }

    #[test]
    fn garbage_is_corrupt() {
        let store = MemoryStore::new();
        store.put("k", b"\x80not json").unwrap();
        let err = get_record::<u32>(&store, "k", "n").unwrap_err();
        assert!(matches!(err, CacheError::Corrupt { .. }));
    }

    #[test]
    fn kind_mismatch_is_corrupt() {
        let store = MemoryStore::new();
        put_record(&store, "k", "graph", 0, &1u32).unwrap();
        let err = get_record::<u32>(&store, "k", "route_set").unwrap_err();
        assert!(matches!(err, CacheError::Corrupt { .. }));
    }

    #[test]
    fn version_mismatch_is_corrupt() {
        let store = MemoryStore::new();
        let json = br#"{"kind":"n","format_version":999,"created_unix_secs":0,"traffic_version":0,"payload":1}"#;
        store.put("k", json).unwrap();
        let err = get_record::<u32>(&store, "k", "n").unwrap_err();
        assert!(matches!(err, CacheError::Corrupt { .. }));
    }

    #[test]
    fn payload_shape_mismatch_is_corrupt() {
        let store = MemoryStore::new();
        put_record(&store, "k", "n", 0, &"text").unwrap();
        assert!(matches!(get_record::<u32>(&store, "k", "n"), Err(CacheError::Corrupt { .. })));
    }
}

// ── Route cache ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod route_cache {
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    use rr_core::TravelMode;

    use crate::{DirStore, KvStore, MemoryStore, RouteCache, RouteKey, StalenessPolicy};

    fn key() -> RouteKey {
        RouteKey::new("Pasar Minggu", "Simpang Lima", 3, TravelMode::Car)
    }

    #[test]
    fn storage_key_format() {
        assert_eq!(key().storage_key(), "routes_Pasar Minggu_Simpang Lima_3_car");
        assert_eq!(
            RouteKey::new("Jl_Sudirman", "50%", 2, TravelMode::Walking).storage_key(),
            "routes_Jl%5FSudirman_50%25_2_walking"
        );
    }

    #[test]
    fn underscores_in_names_do_not_collide() {
        let ab_c = RouteKey::new("A_B", "C", 2, TravelMode::Car);
        let a_bc = RouteKey::new("A", "B_C", 2, TravelMode::Car);
        assert_ne!(ab_c.storage_key(), a_bc.storage_key());

        let escaped = RouteKey::new("A%5FB", "C", 2, TravelMode::Car);
        assert_ne!(ab_c.storage_key(), escaped.storage_key());

        let cache = RouteCache::new(Arc::new(MemoryStore::new()), StalenessPolicy::Never);
        cache.put(&ab_c, 0, &super::helpers::routes(4.2));
        assert!(cache.get(&a_bc, 0).is_none());

        let routes = cache
            .get_or_compute(&a_bc, 0, || Ok::<_, Infallible>(super::helpers::routes(7.5)))
            .unwrap();
        assert_eq!(routes, super::helpers::routes(7.5));
        assert_eq!(cache.get(&ab_c, 0), Some(super::helpers::routes(4.2)));
    }

    #[test]
    fn miss_computes_then_hit_is_identical() {
        let cache = RouteCache::new(Arc::new(MemoryStore::new()), StalenessPolicy::Never);
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>(super::helpers::routes(4.2))
        };

        let first = cache.get_or_compute(&key(), 0, compute).unwrap();
        let second = cache.get_or_compute(&key(), 0, compute).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn never_policy_serves_across_traffic_versions() {
        let cache = RouteCache::new(Arc::new(MemoryStore::new()), StalenessPolicy::Never);
        cache.put(&key(), 0, &super::helpers::routes(4.2));
        assert_eq!(cache.get(&key(), 9), Some(super::helpers::routes(4.2)));
    }

    #[test]
    fn traffic_version_policy_recomputes() {
        let cache = RouteCache::new(Arc::new(MemoryStore::new()), StalenessPolicy::TrafficVersion);
        cache.put(&key(), 0, &super::helpers::routes(4.2));
        assert!(cache.get(&key(), 0).is_some());
        assert!(cache.get(&key(), 1).is_none());

        let fresh = cache
            .get_or_compute(&key(), 1, || Ok::<_, Infallible>(super::helpers::routes(6.0)))
            .unwrap();
        assert_eq!(fresh, super::helpers::routes(6.0));
        assert_eq!(cache.get(&key(), 1), Some(super::helpers::routes(6.0)));
    }

    #[test]
    fn ttl_policy() {
        let store = Arc::new(MemoryStore::new());
        let old = br#"{"kind":"route_set","format_version":1,"created_unix_secs":0,"traffic_version":0,"payload":[]}"#;
        store.put(&key().storage_key(), old).unwrap();

        let cache = RouteCache::new(store.clone(), StalenessPolicy::Ttl { secs: 3600 });
        assert!(cache.get(&key(), 0).is_none());

        cache.put(&key(), 0, &super::helpers::routes(1.0));
        assert!(cache.get(&key(), 0).is_some());
    }

    #[test]
    fn corrupt_entry_is_recomputed_and_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DirStore::open(dir.path()).unwrap());
        store.put(&key().storage_key(), b"{ truncated").unwrap();

        let cache = RouteCache::new(store.clone(), StalenessPolicy::Never);
        let routes = cache
            .get_or_compute(&key(), 0, || Ok::<_, Infallible>(super::helpers::routes(2.5)))
            .unwrap();
        assert_eq!(routes, super::helpers::routes(2.5));
        assert_eq!(cache.get(&key(), 0), Some(routes));
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = RouteCache::new(Arc::new(MemoryStore::new()), StalenessPolicy::Never);
        let err = cache.get_or_compute(&key(), 0, || Err("no path"));
        assert_eq!(err, Err("no path"));
        assert!(cache.get(&key(), 0).is_none());
    }

    #[test]
    fn single_flight_under_concurrency() {
        let cache = Arc::new(RouteCache::new(Arc::new(MemoryStore::new()), StalenessPolicy::Never));
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache
                        .get_or_compute(&key(), 0, || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(std::time::Duration::from_millis(20));
                            Ok::<_, Infallible>(super::helpers::routes(4.2))
                        })
                        .unwrap()
                })
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap(), super::helpers::routes(4.2));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

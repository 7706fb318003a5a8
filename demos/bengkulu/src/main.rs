//! bengkulu: end-to-end run of the route recommendation engine.
//!
//! Builds the engine over a synthetic Bengkulu street grid, requests routes
//! before and after a randomly generated traffic snapshot, and writes one
//! GeoJSON map per route.
//!
//! ```text
//! cargo run -p bengkulu [-- engine.json]
//! RUST_LOG=debug cargo run -p bengkulu
//! ```
//!
//! Output lands in `output/bengkulu/` (graph and route caches under
//! `cache/`, maps under `maps/`).

mod network;

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use rr_cache::{DirStore, StalenessPolicy};
use rr_core::{DepartureTime, NetworkKind, TravelMode};
use rr_engine::{EngineBuilder, EngineConfig, RouteEngine};
use rr_network::{MemoryGraphLoader, load_locations_reader};
use rr_traffic::{TrafficRow, TrafficSnapshot, weather_intensity};

use network::bengkulu_grid;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:       u64  = 42;
const OUTPUT_DIR: &str = "output/bengkulu";

const LOCATIONS_CSV: &str = "\
name,lat,lon\n\
Pasar Minggu,-3.7953,102.2651\n\
Simpang Lima,-3.7926,102.2610\n\
Universitas Bengkulu,-3.7589,102.2723\n\
Benteng Marlborough,-3.7867,102.2520\n\
Pantai Panjang,-3.8126,102.2490\n\
Gang Mawar,-3.8030,102.2800\n\
";

const WEATHER: [&str; 4] = ["clear sky", "scattered clouds", "light rain", "overcast clouds"];

// (start, end, mode, departure)
const REQUESTS: [(&str, &str, TravelMode, Option<&str>); 3] = [
    ("Pasar Minggu", "Universitas Bengkulu", TravelMode::Car, None),
    ("Gang Mawar", "Benteng Marlborough", TravelMode::Motorcycle, Some("2024-06-03 07:45:00")),
    ("Simpang Lima", "Pantai Panjang", TravelMode::Walking, None),
];

// ── Traffic ───────────────────────────────────────────────────────────────────

/// One row per location with random congestion, speed and weather.
fn random_traffic(engine: &RouteEngine, rng: &mut SmallRng) -> TrafficSnapshot {
    engine
        .locations()
        .iter()
        .map(|location| {
            let weather = WEATHER[rng.gen_range(0..WEATHER.len())];
            TrafficRow::new(location.name.clone(), rng.gen_range(0.1..0.95), rng.gen_range(8.0..45.0))
                .with_weather(weather_intensity(weather))
        })
        .collect()
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_routes(engine: &RouteEngine, label: &str) {
    for (start, end, mode, departure) in REQUESTS {
        let departure = departure.and_then(DepartureTime::parse_lenient);
        let routes = engine.get_alternative_routes(start, end, mode, 3, 2, departure);

        println!("{label}: {start} -> {end} by {mode}");
        println!(
            "  {:<4} {:<6} {:>10} {:>10} {:<10} {:<8}",
            "rank", "index", "km", "min", "congestion", "quality"
        );
        for (rank, route) in routes.iter().enumerate() {
            println!(
                "  {:<4} {:<6} {:>10.2} {:>10.2} {:<10} {:<8}",
                rank + 1,
                route.route_index,
                route.total_distance_km,
                route.estimated_time_min,
                route.congestion_level,
                route.route_quality,
            );
        }
        if routes.is_empty() {
            println!("  (no route)");
        }

        for path in engine.create_route_maps(&routes) {
            println!("  map: {}", path.display());
        }
        println!();
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== bengkulu: route recommendation engine ===");
    println!();

    // 1. Configuration: a JSON file if given, else demo defaults.
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_json_file(Path::new(&path))
            .with_context(|| format!("reading engine config {path}"))?,
        None => EngineConfig {
            route_cache_policy: StalenessPolicy::TrafficVersion,
            map_output_dir: Path::new(OUTPUT_DIR).join("maps"),
            ..EngineConfig::default()
        },
    };

    // 2. Locations and graph source.
    let registry = load_locations_reader(Cursor::new(LOCATIONS_CSV))?;
    let loader = MemoryGraphLoader::new()
        .with_area(&config.area_name, NetworkKind::Drive, bengkulu_grid(NetworkKind::Drive))
        .with_area(&config.area_name, NetworkKind::Walk, bengkulu_grid(NetworkKind::Walk));
    let store = Arc::new(DirStore::open(Path::new(OUTPUT_DIR).join("cache"))?);

    // 3. Engine.
    let t0 = Instant::now();
    let engine = EngineBuilder::new(config, registry).loader(loader).store(store).build()?;
    for kind in NetworkKind::ALL {
        let snapshot = engine.snapshot(kind);
        println!(
            "{kind} network: {} nodes, {} edges",
            snapshot.network.node_count(),
            snapshot.network.edge_count()
        );
    }
    println!("Engine built in {:.3} s", t0.elapsed().as_secs_f64());
    println!();

    // 4. Routes under free-flow conditions.
    print_routes(&engine, "free flow");

    // 5. Traffic update, then the same requests again.
    let mut rng = SmallRng::seed_from_u64(SEED);
    let traffic = random_traffic(&engine, &mut rng);
    engine.update_traffic_conditions(&traffic);
    let state = engine.traffic_state();
    info!("traffic version {} applied", state.version);
    println!(
        "Traffic update: {} rows, mean congestion {:.2} ({})",
        traffic.len(),
        state.mean_congestion.unwrap_or(0.0),
        state.congestion_level()
    );
    println!();

    // Same filenames as the free-flow pass: these maps replace those.
    print_routes(&engine, "with traffic");
    println!("Maps written to {}", engine.config().map_output_dir.display());

    Ok(())
}

//! `rr-engine`: the route recommendation engine.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`engine`]      | `RouteEngine`: traffic updates, route requests, maps      |
//! | [`builder`]     | `EngineBuilder`                                           |
//! | [`config`]      | `EngineConfig`                                            |
//! | [`graph_cache`] | persisted normalised networks per `(area, kind)`          |
//! | [`error`]       | `EngineError`, `EngineResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Alternative candidates searched on the Rayon pool.     |
//! | `sqlite`   | `rr_cache::SqliteStore` available as a backing store.  |
//! | `osm`      | `rr_network::osm::PbfGraphLoader` available.           |
//!
//! # Usage
//!
//! ```rust,ignore
//! let engine = EngineBuilder::new(config, registry).loader(loader).build()?;
//! engine.update_traffic_conditions(&snapshot);
//! let routes = engine.get_alternative_routes("Pasar Minggu", "Unib", TravelMode::Car, 3, 1, None);
//! let maps = engine.create_route_maps(&routes);
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph_cache;

#[cfg(test)]
mod tests;

pub use builder::EngineBuilder;
pub use config::EngineConfig;
pub use engine::RouteEngine;
pub use error::{EngineError, EngineResult};
pub use graph_cache::{GRAPH_KIND, graph_key, load_cached_network, load_or_fetch, save_network};

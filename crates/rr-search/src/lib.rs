//! `rr-search`: path search and route construction.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                |
//! |------------------|---------------------------------------------------------|
//! | [`astar`]        | `shortest_path` (A*), `Path`                            |
//! | [`alternatives`] | `k_alternatives`, penalty schedule                      |
//! | [`metrics`]      | `path_metrics`, `PathMetrics`                           |
//! | [`route`]        | `Route`, `RouteSet`, `RouteQuality`                     |
//! | [`planner`]      | `plan_routes`, `RouteQuery`                             |
//! | [`error`]        | `SearchError`, `SearchResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Alternative candidates are searched on the Rayon pool.   |
//!
//! Every search reads one [`NetworkSnapshot`](rr_network::NetworkSnapshot)
//! and never writes to it; alternatives penalise a private copy of the
//! weights.

pub mod alternatives;
pub mod astar;
pub mod error;
pub mod metrics;
pub mod planner;
pub mod route;


pub use alternatives::{k_alternatives, penalty_factor};
pub use astar::{Path, shortest_path};
pub use error::{SearchError, SearchResult};
pub use metrics::{PathMetrics, mode_congestion, path_metrics};
pub use planner::{RouteQuery, plan_routes};
pub use route::{Route, RouteQuality, RouteSet};
pub use rr_traffic::CongestionLevel;

//! `rr-core`: foundational types for the route recommendation engine.
//!
//! This crate is a dependency of every other `rr-*` crate.  It has no
//! `rr-*` dependencies and minimal external ones (`chrono`, `log` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`, `SourceNodeId`                        |
//! | [`geo`]     | `GeoPoint`, haversine and planar distance                 |
//! | [`mode`]    | `TravelMode`, `NetworkKind`, per-mode speed model         |
//! | [`time`]    | `DepartureTime`, rush-hour historical factor              |
//! | [`name`]    | `slugify` for location names                              |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod mode;
pub mod name;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, NodeId, SourceNodeId};
pub use mode::{NetworkKind, TravelMode};
pub use name::slugify;
pub use time::{DepartureTime, historical_factor, historical_factor_str};

//! `rr-traffic`: traffic snapshots and edge re-weighting.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`row`]    | `TrafficRow`, `TrafficSnapshot`, `weather_intensity`       |
//! | [`loader`] | `load_snapshot_csv`, `load_snapshot_reader`                |
//! | [`weight`] | weight formula, `apply`, copy-on-write `reweigh`           |
//! | [`state`]  | `TrafficState`, `CongestionLevel`                          |
//! | [`error`]  | `TrafficError`, `TrafficResult<T>`                         |
//!
//! Only the drivable network is ever re-weighted; the walkable network keeps
//! its base weights.

pub mod error;
pub mod loader;
pub mod row;
pub mod state;
pub mod weight;

#[cfg(test)]
mod tests;

pub use error::{TrafficError, TrafficResult};
pub use loader::{load_snapshot_csv, load_snapshot_reader};
pub use row::{TrafficRow, TrafficSnapshot, weather_intensity};
pub use state::{CongestionLevel, TrafficState};
pub use weight::{apply, edge_weight, reweigh, speed_factor, weather_factor};

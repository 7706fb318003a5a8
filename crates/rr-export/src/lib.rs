//! `rr-export`: route-map artifacts.
//!
//! # Crate layout
//!
//! | Module    | Contents                                               |
//! |-----------|--------------------------------------------------------|
//! | [`map`]   | `MapExporter`, `route_geojson`, `map_filename`         |
//! | [`style`] | line colours, marker colours, popup text               |
//! | [`error`] | `ExportError`, `ExportResult<T>`                       |
//!
//! Maps are GeoJSON `FeatureCollection`s styled with simplestyle
//! properties, so any GeoJSON viewer can render them.

pub mod error;
pub mod map;
pub mod style;


pub use error::{ExportError, ExportResult};
pub use map::{MapExporter, map_filename, route_geojson};
pub use rr_core::slugify;
pub use style::line_color;

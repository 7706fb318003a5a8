//! Styling of route maps.
//!
//! | Route                      | Line colour          |
//! |----------------------------|----------------------|
//! | primary, `Low`             | green  `#4CAF50`     |
//! | primary, `Moderate`        | yellow `#FFCA28`     |
//! | primary, `High`/`Unknown`  | red    `#FF5722`     |
//! | any alternative (rank > 1) | blue   `#2196F3`     |
//!
//! Property names follow the simplestyle convention understood by most
//! GeoJSON viewers.

use rr_search::{CongestionLevel, Route};

pub const LOW_COLOR:         &str = "#4CAF50";
pub const MODERATE_COLOR:    &str = "#FFCA28";
pub const HIGH_COLOR:        &str = "#FF5722";
pub const ALTERNATIVE_COLOR: &str = "#2196F3";

pub const START_MARKER_COLOR: &str = "green";
pub const END_MARKER_COLOR:   &str = "red";

pub const STROKE_WIDTH:   u32 = 5;
pub const STROKE_OPACITY: f64 = 0.8;
pub const ZOOM:           u32 = 13;

/// Line colour for a route drawn at `rank` (1 = primary).
pub fn line_color(level: CongestionLevel, rank: usize) -> &'static str {
    if rank > 1 {
        return ALTERNATIVE_COLOR;
    }
    match level {
        CongestionLevel::Low => LOW_COLOR,
        CongestionLevel::Moderate => MODERATE_COLOR,
        CongestionLevel::High | CongestionLevel::Unknown => HIGH_COLOR,
    }
}

/// Popup text attached to the route line.
pub fn route_popup(route: &Route) -> String {
    format!(
        "Route from {} to {} ({})<br>Distance: {:.2} km<br>Time: {:.2} min<br>Congestion: {}",
        route.start_location,
        route.end_location,
        route.mode,
        route.total_distance_km,
        route.estimated_time_min,
        route.congestion_level,
    )
}

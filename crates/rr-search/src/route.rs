//! Route results and their ordering.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use rr_core::{GeoPoint, SourceNodeId, TravelMode};
use rr_traffic::CongestionLevel;

// ── RouteQuality ──────────────────────────────────────────────────────────────

/// Coarse label derived from the congestion level.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum RouteQuality {
    Good,
    Moderate,
    Poor,
}

impl RouteQuality {
    /// Low → Good, Moderate → Moderate, anything else → Poor.
    pub fn from_congestion(level: CongestionLevel) -> Self {
        match level {
            CongestionLevel::Low => RouteQuality::Good,
            CongestionLevel::Moderate => RouteQuality::Moderate,
            CongestionLevel::High | CongestionLevel::Unknown => RouteQuality::Poor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RouteQuality::Good => "Good",
            RouteQuality::Moderate => "Moderate",
            RouteQuality::Poor => "Poor",
        }
    }
}

impl fmt::Display for RouteQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// One recommended route.  Immutable once produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// 1-based generation order: 1 is the primary A* path, alternatives
    /// follow in penalty order.  Not the rank after sorting.
    pub route_index:        usize,
    /// Loader node ids, start to end.
    pub path:               Vec<SourceNodeId>,
    /// Node positions along `path`; always at least two points.
    pub coordinates:        Vec<GeoPoint>,
    pub total_distance_km:  f64,
    pub estimated_time_min: f64,
    pub congestion_level:   CongestionLevel,
    pub route_quality:      RouteQuality,
    pub start_location:     String,
    pub end_location:       String,
    pub mode:               TravelMode,
}

impl Route {
    /// Ordering of a route set: distance, then time, then Good before others.
    pub fn cmp_rank(&self, other: &Route) -> Ordering {
        self.total_distance_km
            .total_cmp(&other.total_distance_km)
            .then(self.estimated_time_min.total_cmp(&other.estimated_time_min))
            .then_with(|| {
                let good = |r: &Route| r.route_quality != RouteQuality::Good;
                good(self).cmp(&good(other))
            })
    }
}

// ── RouteSet ──────────────────────────────────────────────────────────────────

/// Routes for one `(start, end, mode)` request, best first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteSet(Vec<Route>);

impl RouteSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Sort `routes` into rank order (stable, so equal routes keep their
    /// generation order).
    pub fn from_routes(mut routes: Vec<Route>) -> Self {
        routes.sort_by(Route::cmp_rank);
        Self(routes)
    }

    pub fn routes(&self) -> &[Route] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.0.iter()
    }

    /// The top-ranked route.
    pub fn best(&self) -> Option<&Route> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Route> {
        self.0
    }
}

impl<'a> IntoIterator for &'a RouteSet {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

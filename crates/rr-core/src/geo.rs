//! Geographic coordinate type and spatial utilities.
//!
//! `GeoPoint` stores WGS-84 latitude/longitude as `f64`.  Route coordinates
//! are handed to the presentation layer verbatim, so the points keep the
//! full precision delivered by the graph loader.

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `x` in the graph's planar convention (longitude).
    #[inline]
    pub fn x(self) -> f64 {
        self.lon
    }

    /// `y` in the graph's planar convention (latitude).
    #[inline]
    pub fn y(self) -> f64 {
        self.lat
    }

    /// Both components are finite numbers.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Straight-line distance between the raw `(x, y)` components.
    ///
    /// No projection is applied: the result is in whatever unit the
    /// coordinates are expressed in.
    #[inline]
    pub fn planar_distance(self, other: GeoPoint) -> f64 {
        let dx = other.x() - self.x();
        let dy = other.y() - self.y();
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

//! Traffic snapshot rows.
//!
//! A snapshot is the full set of per-location observations delivered by the
//! traffic provider at one instant.  Rows are transient: they drive one
//! re-weighting pass and are then reduced to the aggregate kept in
//! [`TrafficState`](crate::TrafficState).

use serde::{Deserialize, Serialize};

/// Intensity assigned to rainy conditions.
pub const RAIN_INTENSITY: f64 = 1.0;

/// Intensity assigned to cloudy conditions.
pub const CLOUD_INTENSITY: f64 = 0.5;

/// One location's observation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrafficRow {
    /// Location name, matched against the location bindings.
    pub location:          String,
    /// Saturation in `[0, 1]`.
    pub congestion_ratio:  f64,
    /// Observed mean speed in km/h (> 0).
    pub avg_speed_kph:     f64,
    /// Weather severity in `[0, 1]`.
    pub weather_intensity: f64,
}

impl TrafficRow {
    /// Row with clear weather.
    pub fn new(location: impl Into<String>, congestion_ratio: f64, avg_speed_kph: f64) -> Self {
        Self {
            location: location.into(),
            congestion_ratio,
            avg_speed_kph,
            weather_intensity: 0.0,
        }
    }

    pub fn with_weather(mut self, weather_intensity: f64) -> Self {
        self.weather_intensity = weather_intensity;
        self
    }
}

/// Map a textual weather description to an intensity.
///
/// Any mention of rain → 1.0, of clouds → 0.5, anything else → 0.0.
/// Matching is case-insensitive.
pub fn weather_intensity(description: &str) -> f64 {
    let d = description.to_lowercase();
    if d.contains("rain") {
        RAIN_INTENSITY
    } else if d.contains("cloud") {
        CLOUD_INTENSITY
    } else {
        0.0
    }
}

/// All rows of one provider delivery, in delivery order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficSnapshot {
    pub rows: Vec<TrafficRow>,
}

impl TrafficSnapshot {
    pub fn new(rows: Vec<TrafficRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean congestion ratio over every row, `None` for an empty snapshot.
    pub fn mean_congestion(&self) -> Option<f64> {
        if self.rows.is_empty() {
            return None;
        }
        let sum: f64 = self.rows.iter().map(|r| r.congestion_ratio).sum();
        Some(sum / self.rows.len() as f64)
    }
}

impl FromIterator<TrafficRow> for TrafficSnapshot {
    fn from_iter<I: IntoIterator<Item = TrafficRow>>(iter: I) -> Self {
        Self { rows: iter.into_iter().collect() }
    }
}

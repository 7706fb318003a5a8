//! Aggregate traffic state kept between snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::row::TrafficSnapshot;

/// Mean congestion above which the network is `High`.
pub const HIGH_CONGESTION: f64 = 0.7;

/// Mean congestion above which the network is `Moderate`.
pub const MODERATE_CONGESTION: f64 = 0.4;

/// Network-wide congestion label.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum CongestionLevel {
    Low,
    Moderate,
    High,
    /// No snapshot has been received.
    Unknown,
}

impl CongestionLevel {
    /// Classify a mean congestion ratio; `None` → `Unknown`.
    pub fn from_mean(mean: Option<f64>) -> Self {
        match mean {
            None => CongestionLevel::Unknown,
            Some(m) if m > HIGH_CONGESTION => CongestionLevel::High,
            Some(m) if m > MODERATE_CONGESTION => CongestionLevel::Moderate,
            Some(_) => CongestionLevel::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CongestionLevel::Low => "Low",
            CongestionLevel::Moderate => "Moderate",
            CongestionLevel::High => "High",
            CongestionLevel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What survives of the latest snapshot once its rows have been applied.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TrafficState {
    /// Number of snapshots received (0 = none yet).
    pub version:         u64,
    /// Mean congestion ratio of the latest snapshot.
    pub mean_congestion: Option<f64>,
}

impl TrafficState {
    /// State after receiving `snapshot`.  An empty snapshot clears the mean.
    pub fn advance(&self, snapshot: &TrafficSnapshot) -> Self {
        Self {
            version:         self.version + 1,
            mean_congestion: snapshot.mean_congestion(),
        }
    }

    pub fn congestion_level(&self) -> CongestionLevel {
        CongestionLevel::from_mean(self.mean_congestion)
    }
}

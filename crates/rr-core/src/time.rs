//! Departure-time model.
//!
//! Travel-time estimates are scaled by a *historical factor* that captures
//! the recurring morning and evening peaks:
//!
//! | Departure hour      | Factor |
//! |---------------------|--------|
//! | `[7, 9)`            | 1.5    |
//! | `[17, 19)`          | 1.5    |
//! | anything else       | 1.0    |
//! | no departure given  | 1.0    |
//! | unparsable text     | 1.0    |

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use log::warn;

use crate::CoreError;

/// Multiplier applied to travel time during peak hours.
pub const RUSH_HOUR_FACTOR: f64 = 1.5;

/// Half-open `[start, end)` hour windows considered peak traffic.
pub const RUSH_HOURS: [(u32, u32); 2] = [(7, 9), (17, 19)];

/// Textual forms accepted by [`DepartureTime::parse`], tried in order.
const FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Local wall-clock time at which a trip starts.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DepartureTime(NaiveDateTime);

impl DepartureTime {
    #[inline]
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    /// Parse one of the supported textual timestamp forms.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let trimmed = s.trim();
        FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
            .map(Self)
            .ok_or_else(|| CoreError::Parse(format!("unrecognised departure time {trimmed:?}")))
    }

    /// [`parse`](Self::parse), with a failure logged and mapped to `None`
    /// so the trip is timed without historical adjustment.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match Self::parse(s) {
            Ok(at) => Some(at),
            Err(e) => {
                warn!("{e}; travel time will not be adjusted for departure");
                None
            }
        }
    }

    #[inline]
    pub fn datetime(self) -> NaiveDateTime {
        self.0
    }

    #[inline]
    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    /// `true` if the departure falls inside one of [`RUSH_HOURS`].
    pub fn is_rush_hour(self) -> bool {
        let hour = self.hour();
        RUSH_HOURS.iter().any(|&(start, end)| (start..end).contains(&hour))
    }

    /// Travel-time multiplier for this departure.
    #[inline]
    pub fn historical_factor(self) -> f64 {
        if self.is_rush_hour() { RUSH_HOUR_FACTOR } else { 1.0 }
    }
}

/// Travel-time multiplier for an optional departure; `None` means "now,
/// no historical adjustment".
#[inline]
pub fn historical_factor(departure: Option<DepartureTime>) -> f64 {
    departure.map_or(1.0, DepartureTime::historical_factor)
}

/// Travel-time multiplier for a textual departure; 1.0 if it does not parse.
pub fn historical_factor_str(departure: &str) -> f64 {
    historical_factor(DepartureTime::parse_lenient(departure))
}

impl FromStr for DepartureTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDateTime> for DepartureTime {
    fn from(at: NaiveDateTime) -> Self {
        Self(at)
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

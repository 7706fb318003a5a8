//! Travel modes and the network kind each one is routed on.
//!
//! | Mode         | Network    | Speed model                 |
//! |--------------|------------|-----------------------------|
//! | `Car`        | `Drive`    | edge speed limit            |
//! | `Motorcycle` | `Drive`    | edge speed limit × 0.9      |
//! | `Walking`    | `Walk`     | fixed 5 km/h                |

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Fixed walking speed in km/h.
pub const WALKING_SPEED_KPH: f64 = 5.0;

/// Motorcycles are modelled slightly slower than cars on the same edge.
pub const MOTORCYCLE_SPEED_FACTOR: f64 = 0.9;

/// How the traveller moves.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TravelMode {
    /// Private car.
    #[default]
    Car,
    /// Motorcycle; shares the drivable network with cars.
    Motorcycle,
    /// On foot.
    Walking,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] = [TravelMode::Car, TravelMode::Motorcycle, TravelMode::Walking];

    /// The network this mode is routed on.
    #[inline]
    pub fn network_kind(self) -> NetworkKind {
        match self {
            TravelMode::Car | TravelMode::Motorcycle => NetworkKind::Drive,
            TravelMode::Walking => NetworkKind::Walk,
        }
    }

    /// Effective travel speed (km/h) over an edge with the given speed limit.
    #[inline]
    pub fn effective_speed_kph(self, speed_limit_kph: f64) -> f64 {
        match self {
            TravelMode::Car        => speed_limit_kph,
            TravelMode::Motorcycle => speed_limit_kph * MOTORCYCLE_SPEED_FACTOR,
            TravelMode::Walking    => WALKING_SPEED_KPH,
        }
    }

    /// Lower-case label used in cache keys and file names.
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Car        => "car",
            TravelMode::Motorcycle => "motorcycle",
            TravelMode::Walking    => "walking",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" | "drive" | "driving" => Ok(TravelMode::Car),
            "motorcycle" | "motorbike"  => Ok(TravelMode::Motorcycle),
            "walking" | "walk"          => Ok(TravelMode::Walking),
            other => Err(CoreError::UnknownMode(other.to_owned())),
        }
    }
}

/// Which of the two independently loaded graphs a piece of data belongs to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NetworkKind {
    /// Serves car and motorcycle modes.
    Drive,
    /// Serves walking mode.
    Walk,
}

impl NetworkKind {
    pub const ALL: [NetworkKind; 2] = [NetworkKind::Drive, NetworkKind::Walk];

    pub fn as_str(self) -> &'static str {
        match self {
            NetworkKind::Drive => "drive",
            NetworkKind::Walk  => "walk",
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

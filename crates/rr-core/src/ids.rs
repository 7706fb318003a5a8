//! Strongly typed, zero-cost identifier wrappers.
//!
//! Two families of node identity exist:
//!
//! - [`NodeId`] / [`EdgeId`] are dense indices into one built
//!   `RoadNetwork`.  They are only meaningful for the network that issued
//!   them and change whenever a network is rebuilt.
//! - [`SourceNodeId`] is the opaque integer handed out by the graph loader
//!   (an OSM node id in practice).  It survives rebuilds, which is why
//!   `Route::path` and persisted records use it.

use std::fmt;

/// Generate a typed dense-index wrapper around an unsigned integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a node in one built road network.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed edge in one built road network.
    pub struct EdgeId(u32);
}

/// Identifier assigned to a node by the external graph loader.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SourceNodeId(pub i64);

impl fmt::Display for SourceNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SourceNodeId {
    #[inline]
    fn from(raw: i64) -> Self {
        SourceNodeId(raw)
    }
}

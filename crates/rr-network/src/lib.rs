//! `rr-network`: the road graph store. Loading, normalisation, spatial
//! indexing, and location binding.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`raw`]       | `RawGraph`, `RawNode`, `RawEdge`, `RawSpeed` (loader output)  |
//! | [`loader`]    | `GraphLoader` trait, area/point-radius strategy, `MemoryGraphLoader` |
//! | [`normalize`] | `normalize`: coordinate purge, attribute derivation           |
//! | [`network`]   | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`, `EdgeAttrs` |
//! | [`snapshot`]  | `EdgeWeights`, `NetworkSnapshot` (copy-on-write versions)     |
//! | [`location`]  | `Location`, `LocationRegistry`, `LocationBindings`, CSV loader |
//! | [`record`]    | `NetworkRecord` for the persisted graph cache                 |
//! | [`osm`]       | `PbfGraphLoader` (feature = `"osm"` only)                     |
//! | [`error`]     | `NetworkError`, `NetworkResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag  | Effect                                                  |
//! |-------|---------------------------------------------------------|
//! | `osm` | Enables OSM PBF loading via the `osmpbf` crate.         |

pub mod error;
pub mod loader;
pub mod location;
pub mod network;
pub mod normalize;
pub mod raw;
pub mod record;
pub mod snapshot;

#[cfg(feature = "osm")]
pub mod osm;


pub use error::{NetworkError, NetworkResult};
pub use loader::{AreaQuery, GraphLoader, MemoryGraphLoader, load_network, load_raw_graph};
pub use location::{
    DEFAULT_BIND_SEARCH_K, Location, LocationBindings, LocationRegistry, bind_location,
    load_locations_csv, load_locations_reader,
};
pub use network::{EdgeAttrs, RoadNetwork, RoadNetworkBuilder};
pub use normalize::{normalize, road_class_preference};
pub use raw::{RawEdge, RawGraph, RawNode, RawSpeed};
pub use record::NetworkRecord;
pub use snapshot::{EdgeWeights, NetworkSnapshot};

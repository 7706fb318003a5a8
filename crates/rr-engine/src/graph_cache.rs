//! Persisted graph cache: one normalised network per `(area, kind)`.
//!
//! ```text
//! store[graph_<area>_<kind>] ──hit──▶ NetworkRecord ──▶ RoadNetwork
//!        │                  └─corrupt─▶ warn ─┐
//!        └──miss──────────────────────────────┴─▶ loader ──▶ save ──▶ RoadNetwork
//! ```
//!
//! A record that decodes but does not rebuild (bad indices, wrong kind) is
//! corrupt too.  Failing to save is logged and otherwise ignored.

use log::{info, warn};

use rr_cache::{KvStore, get_record, put_record};
use rr_core::NetworkKind;
use rr_network::{AreaQuery, GraphLoader, NetworkRecord, RoadNetwork, load_network};

use crate::EngineResult;

/// Envelope kind of cached networks.
pub const GRAPH_KIND: &str = "road_network";

pub fn graph_key(area: &str, kind: NetworkKind) -> String {
    format!("graph_{area}_{kind}")
}

/// The cached network for `(area, kind)`, if present and intact.
pub fn load_cached_network(store: &dyn KvStore, area: &str, kind: NetworkKind) -> Option<RoadNetwork> {
    let key = graph_key(area, kind);
    let record = match get_record::<NetworkRecord>(store, &key, GRAPH_KIND) {
        Ok(Some(entry)) => entry.payload,
        Ok(None) => return None,
        Err(e) => {
            warn!("graph cache entry {key:?} unusable ({e}); reloading");
            return None;
        }
    };

    if record.kind != kind {
        warn!("graph cache entry {key:?} holds a {} network; reloading", record.kind);
        return None;
    }
    match record.into_network() {
        Ok(network) => {
            info!(
                "loaded {kind} network from cache: {} nodes, {} edges",
                network.node_count(),
                network.edge_count()
            );
            Some(network)
        }
        Err(e) => {
            warn!("graph cache entry {key:?} is corrupt ({e}); reloading");
            None
        }
    }
}

/// Persist `network` under `(area, kind)`, overwriting any previous entry.
pub fn save_network(store: &dyn KvStore, area: &str, network: &RoadNetwork) {
    let key = graph_key(area, network.kind);
    match put_record(store, &key, GRAPH_KIND, 0, &NetworkRecord::from_network(network)) {
        Ok(()) => info!("saved {} network to graph cache", network.kind),
        Err(e) => warn!("failed to save {} network to graph cache: {e}", network.kind),
    }
}

/// Cached network if available, otherwise load through `loader` and cache
/// the result.
///
/// # Errors
///
/// Only loader failures ([`NetworkError::GraphLoad`](rr_network::NetworkError::GraphLoad)).
pub fn load_or_fetch(
    store:  &dyn KvStore,
    loader: &dyn GraphLoader,
    query:  &AreaQuery,
    kind:   NetworkKind,
) -> EngineResult<RoadNetwork> {
    if let Some(network) = load_cached_network(store, &query.area_name, kind) {
        return Ok(network);
    }
    let network = load_network(loader, query, kind)?;
    save_network(store, &query.area_name, &network);
    Ok(network)
}

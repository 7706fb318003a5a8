//! The public operations surface.
//!
//! # Versions
//!
//! Each network kind publishes its current [`NetworkSnapshot`] behind an
//! `RwLock<Arc<_>>`.  A request checks out the `Arc` together with the
//! traffic state and works on that version until it returns.  A traffic
//! update re-weights a copy off-lock and swaps the pointer, so a request
//! never sees a half-applied update.
//!
//! # Failure surface
//!
//! | Operation                     | On failure                         |
//! |-------------------------------|------------------------------------|
//! | `get_alternative_routes`      | empty `RouteSet`, cause logged     |
//! | `try_get_alternative_routes`  | `EngineError`                      |
//! | `create_route_map`            | `None`, cause logged               |
//! | `update_traffic_conditions`   | cannot fail                        |

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::{debug, error, info, warn};

use rr_cache::{RouteCache, RouteKey};
use rr_core::{DepartureTime, NetworkKind, NodeId, SourceNodeId, TravelMode};
use rr_export::{MapExporter, map_filename};
use rr_network::{LocationBindings, LocationRegistry, NetworkSnapshot};
use rr_search::{Route, RouteQuery, RouteSet, SearchError, plan_routes};
use rr_traffic::{TrafficSnapshot, TrafficState, reweigh};

use crate::{EngineConfig, EngineError, EngineResult};

// ── NetworkSlot ───────────────────────────────────────────────────────────────

/// Current version of one network kind plus its location bindings.
pub(crate) struct NetworkSlot {
    current:  RwLock<Arc<NetworkSnapshot>>,
    bindings: LocationBindings,
}

impl NetworkSlot {
    pub(crate) fn new(snapshot: NetworkSnapshot, bindings: LocationBindings) -> Self {
        Self { current: RwLock::new(Arc::new(snapshot)), bindings }
    }

    fn checkout(&self) -> Arc<NetworkSnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn publish(&self, snapshot: NetworkSnapshot) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);
    }
}

// ── RouteEngine ───────────────────────────────────────────────────────────────

/// Route recommendation over a drivable and a walkable network.
///
/// Built by [`EngineBuilder`](crate::EngineBuilder).  All methods take
/// `&self`; share the engine across request threads with `Arc`.
pub struct RouteEngine {
    pub(crate) config:   EngineConfig,
    pub(crate) registry: LocationRegistry,
    pub(crate) drive:    NetworkSlot,
    pub(crate) walk:     NetworkSlot,
    pub(crate) traffic:  RwLock<TrafficState>,
    /// Serialises traffic updates so versions are applied in order.
    pub(crate) updates:  Mutex<()>,
    pub(crate) routes:   RouteCache,
    pub(crate) exporter: MapExporter,
}

impl RouteEngine {
    // ── Traffic ───────────────────────────────────────────────────────────

    /// Fold a traffic snapshot into the drivable network.
    ///
    /// Each row overwrites the weights of the edges touching its location's
    /// node.  The walkable network is never re-weighted.  The traffic
    /// version advances even when no row matches a bound location.
    pub fn update_traffic_conditions(&self, snapshot: &TrafficSnapshot) {
        let _update = self.updates.lock().unwrap_or_else(PoisonError::into_inner);

        let next = self.traffic_state().advance(snapshot);
        let current = self.drive.checkout();
        let updated = reweigh(&current, &snapshot.rows, &self.drive.bindings, next.version);

        // Same lock order as `checkout_for`: traffic, then network.
        let mut traffic = self.traffic.write().unwrap_or_else(PoisonError::into_inner);
        self.drive.publish(updated);
        *traffic = next;
        info!(
            "traffic version {}: {} rows, network congestion {}",
            next.version,
            snapshot.len(),
            next.congestion_level()
        );
    }

    pub fn traffic_state(&self) -> TrafficState {
        *self.traffic.read().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Routes ────────────────────────────────────────────────────────────

    /// Routes from `start` to `end`, best first.
    ///
    /// `max_alternatives` counts the primary route.  Fewer than
    /// `min_alternatives` routes only logs a warning.  Any failure (unknown
    /// or unbound location, disconnected endpoints) is logged and yields an
    /// empty set.
    pub fn get_alternative_routes(
        &self,
        start:            &str,
        end:              &str,
        mode:             TravelMode,
        max_alternatives: usize,
        min_alternatives: usize,
        departure:        Option<DepartureTime>,
    ) -> RouteSet {
        match self.try_get_alternative_routes(start, end, mode, max_alternatives, min_alternatives, departure) {
            Ok(routes) => routes,
            Err(EngineError::Search(e @ SearchError::NoPath { .. })) => {
                info!("no route from {start:?} to {end:?} by {mode}: {e}");
                RouteSet::empty()
            }
            Err(e) => {
                error!("route request {start:?} -> {end:?} by {mode} failed: {e}");
                RouteSet::empty()
            }
        }
    }

    /// [`get_alternative_routes`](Self::get_alternative_routes) with the
    /// failure cause returned instead of logged.
    pub fn try_get_alternative_routes(
        &self,
        start:            &str,
        end:              &str,
        mode:             TravelMode,
        max_alternatives: usize,
        min_alternatives: usize,
        departure:        Option<DepartureTime>,
    ) -> EngineResult<RouteSet> {
        let kind = mode.network_kind();
        let from = self.bound_node(start, kind)?;
        let to = self.bound_node(end, kind)?;
        let (traffic, snapshot) = self.checkout_for(kind);

        // Traffic never re-weights the walkable network, so walking routes
        // are stamped with version 0 and do not go stale on updates.
        let version = match kind {
            NetworkKind::Drive => traffic.version,
            NetworkKind::Walk => 0,
        };
        let key = RouteKey::new(start, end, max_alternatives, mode);
        debug!("route request {key} at traffic version {version}");

        let routes = self.routes.get_or_compute(&key, version, || {
            let query = RouteQuery {
                start_location: start,
                end_location: end,
                from,
                to,
                mode,
                max_alternatives,
                departure,
            };
            plan_routes(&snapshot, &query, traffic.congestion_level())
        })?;

        if routes.len() < min_alternatives {
            warn!(
                "only {} distinct route(s) from {start:?} to {end:?} by {mode}; {min_alternatives} requested",
                routes.len()
            );
        }
        Ok(routes)
    }

    /// Routes using the configured default alternative counts.
    pub fn get_routes(&self, start: &str, end: &str, mode: TravelMode, departure: Option<DepartureTime>) -> RouteSet {
        self.get_alternative_routes(
            start,
            end,
            mode,
            self.config.default_max_alternatives,
            self.config.default_min_alternatives,
            departure,
        )
    }

    // ── Maps ──────────────────────────────────────────────────────────────

    /// Write a map of `route` drawn at `rank` (1 = primary) to
    /// `<map_output_dir>/<filename>`.  `None` on failure, logged.
    pub fn create_route_map(&self, route: &Route, filename: &str, rank: usize) -> Option<PathBuf> {
        match self.exporter.export(route, filename, rank) {
            Ok(path) => Some(path),
            Err(e) => {
                error!("failed to create route map {filename:?}: {e}");
                None
            }
        }
    }

    /// One map per route of `routes`, ranked in set order and named by
    /// [`map_filename`].  Routes whose export fails are skipped.
    pub fn create_route_maps(&self, routes: &RouteSet) -> Vec<PathBuf> {
        routes
            .iter()
            .enumerate()
            .filter_map(|(i, route)| {
                let rank = i + 1;
                let filename = map_filename(&route.start_location, &route.end_location, route.mode, rank);
                self.create_route_map(route, &filename, rank)
            })
            .collect()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn locations(&self) -> &LocationRegistry {
        &self.registry
    }

    /// The current version of `kind`'s network.
    pub fn snapshot(&self, kind: NetworkKind) -> Arc<NetworkSnapshot> {
        self.slot(kind).checkout()
    }

    /// Loader id of the node `name` is bound to on `kind`'s network.
    pub fn location_node(&self, name: &str, kind: NetworkKind) -> Option<SourceNodeId> {
        let slot = self.slot(kind);
        let node = slot.bindings.node(name)?;
        Some(slot.checkout().network.source_id(node))
    }

    fn slot(&self, kind: NetworkKind) -> &NetworkSlot {
        match kind {
            NetworkKind::Drive => &self.drive,
            NetworkKind::Walk => &self.walk,
        }
    }

    fn bound_node(&self, name: &str, kind: NetworkKind) -> EngineResult<NodeId> {
        self.slot(kind)
            .bindings
            .node(name)
            .ok_or_else(|| EngineError::UnboundLocation { name: name.to_owned(), kind })
    }

    /// Traffic state and network version, read as one consistent pair.
    fn checkout_for(&self, kind: NetworkKind) -> (TrafficState, Arc<NetworkSnapshot>) {
        let traffic = self.traffic.read().unwrap_or_else(PoisonError::into_inner);
        (*traffic, self.slot(kind).checkout())
    }
}

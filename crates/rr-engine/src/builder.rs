//! Fluent builder for constructing a [`RouteEngine`].

use std::sync::Arc;

use log::info;

use rr_cache::{KvStore, MemoryStore, RouteCache};
use rr_core::NetworkKind;
use rr_export::MapExporter;
use rr_network::{GraphLoader, LocationBindings, LocationRegistry, NetworkSnapshot};

use crate::engine::NetworkSlot;
use crate::graph_cache::load_or_fetch;
use crate::{EngineConfig, EngineError, EngineResult, RouteEngine};

/// Fluent builder for [`RouteEngine`].
///
/// # Required inputs
///
/// - [`EngineConfig`]: area query, binding, cache policy, output directory
/// - [`LocationRegistry`]: named locations requests refer to
/// - a [`GraphLoader`]: supplied with `.loader(l)`
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                              |
/// |-----------------|--------------------------------------|
/// | `.store(s)`     | `MemoryStore` (nothing persisted)    |
///
/// The store holds both the graph cache and the route cache.
///
/// # Example
///
/// ```rust,ignore
/// let engine = EngineBuilder::new(EngineConfig::default(), registry)
///     .loader(PbfGraphLoader::new("data/osm"))
///     .store(Arc::new(DirStore::open("cache")?))
///     .build()?;
/// let routes = engine.get_alternative_routes("Pasar Minggu", "Unib", TravelMode::Car, 3, 1, None);
/// ```
pub struct EngineBuilder {
    config:   EngineConfig,
    registry: LocationRegistry,
    loader:   Option<Box<dyn GraphLoader>>,
    store:    Option<Arc<dyn KvStore>>,
}

impl EngineBuilder {
    pub fn new(config: EngineConfig, registry: LocationRegistry) -> Self {
        Self { config, registry, loader: None, store: None }
    }

    /// Source of raw graphs, consulted when the graph cache has no entry.
    pub fn loader(mut self, loader: impl GraphLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Backing store for the graph and route caches.
    pub fn store(mut self, store: Arc<dyn KvStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Load both networks, bind every location, and return a ready engine.
    ///
    /// # Errors
    ///
    /// Invalid configuration, a missing loader, or a graph that neither load
    /// strategy can supply.
    pub fn build(self) -> EngineResult<RouteEngine> {
        self.config.validate()?;
        let loader = self
            .loader
            .ok_or_else(|| EngineError::Config("no graph loader supplied".into()))?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn KvStore>);
        let query = self.config.area_query();

        // ── Networks and bindings ─────────────────────────────────────────
        let slot = |kind: NetworkKind| -> EngineResult<NetworkSlot> {
            let network = load_or_fetch(store.as_ref(), loader.as_ref(), &query, kind)?;
            let bindings = LocationBindings::bind_all(&network, &self.registry, self.config.bind_search_k);
            Ok(NetworkSlot::new(NetworkSnapshot::new(Arc::new(network)), bindings))
        };
        let drive = slot(NetworkKind::Drive)?;
        let walk = slot(NetworkKind::Walk)?;

        info!(
            "route engine ready for {:?}: {} locations, route cache policy {:?}",
            self.config.area_name,
            self.registry.len(),
            self.config.route_cache_policy
        );

        Ok(RouteEngine {
            routes:   RouteCache::new(store, self.config.route_cache_policy),
            exporter: MapExporter::new(self.config.map_output_dir.clone()),
            drive,
            walk,
            registry: self.registry,
            traffic:  Default::default(),
            updates:  Default::default(),
            config:   self.config,
        })
    }
}

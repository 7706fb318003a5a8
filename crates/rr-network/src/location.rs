//! Named locations and their binding to graph nodes.
//!
//! A [`Location`] is a named coordinate.  The [`LocationRegistry`] owns the
//! set of known locations; [`LocationBindings`] maps each location name to
//! one node of one specific network.  Each network kind gets its own
//! bindings, because the drivable and walkable graphs have independent node
//! sets.
//!
//! Map artifacts are named after slugified location names, so the registry
//! refuses a name whose slug is already taken by a different name.
//!
//! # CSV format
//!
//! ```csv
//! name,lat,lon
//! Pasar Minggu,-3.795212,102.266424
//! Simpang Lima,-3.797211,102.265972
//! ```

use std::io::Read;
use std::path::Path;

use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use rr_core::{GeoPoint, NetworkKind, NodeId, slugify};

use crate::{NetworkError, NetworkResult, RoadNetwork};

/// Nearest candidates inspected when the closest node has no edges.
pub const DEFAULT_BIND_SEARCH_K: usize = 16;

// ── Location ──────────────────────────────────────────────────────────────────

/// A named point of interest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name:   String,
    pub coords: GeoPoint,
}

impl Location {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self { name: name.into(), coords: GeoPoint::new(lat, lon) }
    }
}

// ── LocationRegistry ──────────────────────────────────────────────────────────

/// Known locations, unique by name and by slug, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct LocationRegistry {
    locations: Vec<Location>,
    by_name:   FxHashMap<String, usize>,
    by_slug:   FxHashMap<String, usize>,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `locations`, inserted in order.
    ///
    /// # Errors
    ///
    /// The first [`NetworkError::NameClash`] met.
    pub fn from_locations(locations: impl IntoIterator<Item = Location>) -> NetworkResult<Self> {
        let mut registry = Self::new();
        for location in locations {
            registry.insert(location)?;
        }
        Ok(registry)
    }

    /// Add a location.  A location with the same name is replaced in place.
    ///
    /// # Errors
    ///
    /// [`NetworkError::NameClash`] if a different name has the same slug;
    /// the registry is left unchanged.
    pub fn insert(&mut self, location: Location) -> NetworkResult<()> {
        if let Some(&slot) = self.by_name.get(&location.name) {
            warn!("location {:?} defined twice; keeping the later coordinates", location.name);
            self.locations[slot] = location;
            return Ok(());
        }

        let slug = slugify(&location.name);
        if let Some(&slot) = self.by_slug.get(&slug) {
            return Err(NetworkError::NameClash {
                name:     location.name,
                existing: self.locations[slot].name.clone(),
                slug,
            });
        }
        let slot = self.locations.len();
        self.by_name.insert(location.name.clone(), slot);
        self.by_slug.insert(slug, slot);
        self.locations.push(location);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Location> {
        self.by_name.get(name).map(|&i| &self.locations[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

// ── Binding ───────────────────────────────────────────────────────────────────

/// Resolve `coords` to a routable node of `network`.
///
/// The nearest node is used if it has at least one edge.  Otherwise the
/// `search_k` nearest nodes are scanned in distance order and the first with
/// nonzero degree is substituted.  `None` (logged at `warn`) when nothing
/// routable is found; the location stays unroutable until rebound.
pub fn bind_location(
    network:  &RoadNetwork,
    name:     &str,
    coords:   GeoPoint,
    search_k: usize,
) -> Option<NodeId> {
    let Some(nearest) = network.snap_to_node(coords) else {
        warn!("cannot bind {name:?}: {} network has no nodes", network.kind);
        return None;
    };
    if network.degree(nearest) > 0 {
        return Some(nearest);
    }

    let substitute = network
        .k_nearest_nodes(coords, search_k)
        .into_iter()
        .find(|&n| network.degree(n) > 0);
    match substitute {
        Some(node) => {
            debug!(
                "{name:?}: nearest {} node {} is isolated, using {} instead",
                network.kind,
                network.source_id(nearest),
                network.source_id(node)
            );
            Some(node)
        }
        None => {
            warn!(
                "cannot bind {name:?}: no connected {} node among {search_k} nearest to {coords}",
                network.kind
            );
            None
        }
    }
}

/// Location name → node for one network.
#[derive(Clone, Debug)]
pub struct LocationBindings {
    kind:  NetworkKind,
    nodes: FxHashMap<String, NodeId>,
}

impl LocationBindings {
    pub fn new(kind: NetworkKind) -> Self {
        Self { kind, nodes: FxHashMap::default() }
    }

    /// Bind every registered location to `network`.  Locations that cannot
    /// be bound are skipped.
    pub fn bind_all(network: &RoadNetwork, registry: &LocationRegistry, search_k: usize) -> Self {
        let mut bindings = Self::new(network.kind);
        for location in registry.iter() {
            bindings.rebind(network, location, search_k);
        }
        info!(
            "bound {}/{} locations to {} network",
            bindings.len(),
            registry.len(),
            network.kind
        );
        bindings
    }

    /// (Re)bind one location, replacing any previous binding.  Returns the
    /// new node, or `None` after removing the stale binding.
    pub fn rebind(&mut self, network: &RoadNetwork, location: &Location, search_k: usize) -> Option<NodeId> {
        match bind_location(network, &location.name, location.coords, search_k) {
            Some(node) => {
                self.nodes.insert(location.name.clone(), node);
                Some(node)
            }
            None => {
                self.nodes.remove(&location.name);
                None
            }
        }
    }

    pub fn kind(&self) -> NetworkKind {
        self.kind
    }

    /// Node bound to `name`, if any.
    pub fn node(&self, name: &str) -> Option<NodeId> {
        self.nodes.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.nodes.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LocationRecord {
    name: String,
    lat:  f64,
    lon:  f64,
}

/// Load a [`LocationRegistry`] from a `name,lat,lon` CSV file.
pub fn load_locations_csv(path: &Path) -> NetworkResult<LocationRegistry> {
    let file = std::fs::File::open(path)?;
    load_locations_reader(file)
}

/// Like [`load_locations_csv`] but accepts any `Read` source.
pub fn load_locations_reader<R: Read>(reader: R) -> NetworkResult<LocationRegistry> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut registry = LocationRegistry::new();

    for result in csv_reader.deserialize::<LocationRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        if row.name.is_empty() {
            return Err(NetworkError::Parse("location with empty name".to_owned()));
        }
        let coords = GeoPoint::new(row.lat, row.lon);
        if !coords.is_valid() {
            return Err(NetworkError::Parse(format!("location {:?} has invalid coordinates", row.name)));
        }
        registry.insert(Location { name: row.name, coords })?;
    }

    Ok(registry)
}

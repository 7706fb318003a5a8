//! OSM PBF graph loader, enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use rr_network::osm::PbfGraphLoader;
//!
//! let loader = PbfGraphLoader::new("data/areas").with_region_file("data/sumatra.osm.pbf");
//! let network = rr_network::load_network(&loader, &AreaQuery::default(), NetworkKind::Drive)?;
//! ```
//!
//! # Files
//!
//! | Query               | File read                                              |
//! |---------------------|--------------------------------------------------------|
//! | `load_area(name)`   | `<area_dir>/<slug(name)>.osm.pbf`                      |
//! | `load_point_radius` | the region file, clipped to the radius around `center` |
//!
//! `slug("Bengkulu, Indonesia")` is `bengkulu-indonesia`.
//!
//! # What is loaded
//!
//! `highway=*` ways usable by the requested network kind (see
//! [`usable_by`]).  Drivable one-way roads add a single directed edge;
//! everything else adds both directions.  Edge length is the haversine
//! distance between consecutive way nodes; `maxspeed` is passed through raw.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use log::debug;
use osmpbf::{Element, ElementReader};

use rr_core::{GeoPoint, NetworkKind, SourceNodeId};

use crate::raw::{RawEdge, RawGraph, RawNode, RawSpeed};
use crate::{GraphLoader, NetworkError, NetworkResult};

// ── PbfGraphLoader ────────────────────────────────────────────────────────────

/// A [`GraphLoader`] over local `.osm.pbf` extracts.
#[derive(Clone, Debug)]
pub struct PbfGraphLoader {
    area_dir:    PathBuf,
    region_file: Option<PathBuf>,
}

impl PbfGraphLoader {
    pub fn new(area_dir: impl Into<PathBuf>) -> Self {
        Self { area_dir: area_dir.into(), region_file: None }
    }

    /// Extract used for point-radius queries.
    pub fn with_region_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.region_file = Some(path.into());
        self
    }

    pub fn area_path(&self, area: &str) -> PathBuf {
        self.area_dir.join(format!("{}.osm.pbf", slug(area)))
    }
}

impl GraphLoader for PbfGraphLoader {
    fn load_area(&self, area: &str, kind: NetworkKind) -> NetworkResult<RawGraph> {
        let path = self.area_path(area);
        if !path.is_file() {
            return Err(NetworkError::Loader(format!("no extract for {area:?} at {}", path.display())));
        }
        read_pbf(&path, kind, |_| true)
    }

    fn load_point_radius(
        &self,
        center:   GeoPoint,
        radius_m: f64,
        kind:     NetworkKind,
    ) -> NetworkResult<RawGraph> {
        let path = self
            .region_file
            .as_deref()
            .ok_or_else(|| NetworkError::Loader("no region file configured".to_owned()))?;
        read_pbf(path, kind, |pos| center.distance_m(pos) <= radius_m)
    }
}

// ── Reading ───────────────────────────────────────────────────────────────────

struct OsmWay {
    refs:     Vec<i64>,
    highway:  String,
    maxspeed: Option<String>,
    oneway:   bool,
}

/// Read one extract, keeping ways usable by `kind` and nodes accepted by
/// `keep`.  Way segments with an endpoint outside `keep` are dropped.
fn read_pbf(path: &Path, kind: NetworkKind, keep: impl Fn(GeoPoint) -> bool) -> NetworkResult<RawGraph> {
    // ── Phase 1: all nodes + usable ways in one sequential pass ──────────
    let reader = ElementReader::from_path(path).map_err(|e| NetworkError::Osm(e.to_string()))?;

    let mut all_nodes: HashMap<i64, GeoPoint> = HashMap::new();
    let mut ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
            }
            Element::DenseNode(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
            }
            Element::Way(w) => {
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let tag = |key: &str| tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);

                if let Some(highway) = tag("highway").filter(|h| usable_by(kind, h)) {
                    ways.push(OsmWay {
                        refs:     w.refs().collect(),
                        highway:  highway.to_owned(),
                        maxspeed: tag("maxspeed").map(str::to_owned),
                        oneway:   kind == NetworkKind::Drive && is_oneway(highway, &tags),
                    });
                }
            }
            _ => {}
        })
        .map_err(|e| NetworkError::Osm(e.to_string()))?;

    // ── Phase 2: road-referenced nodes inside the query ──────────────────
    let road_node_ids: HashSet<i64> = ways.iter().flat_map(|w| w.refs.iter().copied()).collect();
    let kept: HashMap<i64, GeoPoint> = road_node_ids
        .into_iter()
        .filter_map(|id| all_nodes.get(&id).map(|&pos| (id, pos)))
        .filter(|&(_, pos)| keep(pos))
        .collect();
    drop(all_nodes);

    // ── Phase 3: raw graph ────────────────────────────────────────────────
    let mut nodes: Vec<RawNode> = kept
        .iter()
        .map(|(&id, pos)| RawNode::new(id, pos.lat, pos.lon))
        .collect();
    nodes.sort_by_key(|n| n.id);

    let mut edges = Vec::new();
    for way in &ways {
        for pair in way.refs.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (Some(&pa), Some(&pb)) = (kept.get(&a), kept.get(&b)) else {
                continue;
            };
            let edge = RawEdge {
                u:        SourceNodeId(a),
                v:        SourceNodeId(b),
                length_m: Some(pa.distance_m(pb)),
                maxspeed: way.maxspeed.clone().map(RawSpeed::Text),
                highway:  Some(way.highway.clone()),
            };
            if !way.oneway {
                edges.push(RawEdge { u: edge.v, v: edge.u, ..edge.clone() });
            }
            edges.push(edge);
        }
    }

    debug!(
        "read {} ({kind}): {} ways, {} nodes, {} edges",
        path.display(),
        ways.len(),
        nodes.len(),
        edges.len()
    );
    Ok(RawGraph { nodes, edges })
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// Whether a `highway=*` value belongs in the network of `kind`.
pub fn usable_by(kind: NetworkKind, highway: &str) -> bool {
    match kind {
        NetworkKind::Drive => !matches!(
            highway,
            "footway" | "path" | "cycleway" | "pedestrian" | "steps" | "track" | "bridleway"
                | "corridor" | "proposed" | "construction"
        ),
        NetworkKind::Walk => !matches!(
            highway,
            "motorway" | "motorway_link" | "trunk" | "trunk_link" | "proposed" | "construction"
        ),
    }
}

/// One-way for car traffic.  Motorways are implicitly one-way in OSM.
fn is_oneway(highway: &str, tags: &[(&str, &str)]) -> bool {
    let explicit = tags.iter().any(|(k, v)| *k == "oneway" && matches!(*v, "yes" | "1" | "true"));
    let implicit = matches!(highway, "motorway" | "motorway_link");
    explicit || implicit
}

/// Lowercase, alphanumeric runs joined by `-`.
pub fn slug(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

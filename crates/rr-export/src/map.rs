//! GeoJSON route-map artifacts.
//!
//! A map is a `FeatureCollection` of three features: the route line, a start
//! marker and an end marker.  The collection carries two foreign members for
//! viewers that honour them: `center` (`[lon, lat]` of the first route
//! point) and `zoom`.

use std::fs;
use std::path::{Component, Path, PathBuf};

use geo::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use log::info;
use serde_json::json;

use rr_core::{GeoPoint, TravelMode, slugify};
use rr_search::Route;

use crate::style::{
    END_MARKER_COLOR, START_MARKER_COLOR, STROKE_OPACITY, STROKE_WIDTH, ZOOM, line_color,
    route_popup,
};
use crate::{ExportError, ExportResult};

/// Writes route maps into one output directory.
#[derive(Clone, Debug)]
pub struct MapExporter {
    output_dir: PathBuf,
}

impl MapExporter {
    /// The directory is created lazily on the first export.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render `route` at `rank` and write it to `<output_dir>/<filename>`.
    ///
    /// Returns the absolute path of the written file.  An existing file of
    /// the same name is overwritten.
    pub fn export(&self, route: &Route, filename: &str, rank: usize) -> ExportResult<PathBuf> {
        info!(
            "creating route map for {} -> {} via {} (rank {rank})",
            route.start_location, route.end_location, route.mode
        );

        let collection = route_geojson(route, rank)?;
        if !is_plain_filename(filename) {
            return Err(ExportError::InvalidFilename(filename.to_owned()));
        }

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(filename);
        fs::write(&path, serde_json::to_vec_pretty(&collection)?)?;

        if !path.is_file() {
            return Err(ExportError::Missing(path));
        }
        let path = fs::canonicalize(&path)?;
        info!("route map saved to {}", path.display());
        Ok(path)
    }
}

/// Build the map of `route` drawn at `rank` (1 = primary).
pub fn route_geojson(route: &Route, rank: usize) -> ExportResult<FeatureCollection> {
    let (first, last) = match route.coordinates.as_slice() {
        [first, .., last] => (*first, *last),
        points => return Err(ExportError::TooFewCoordinates(points.len())),
    };

    let line = LineString::new(route.coordinates.iter().map(|p| to_coord(*p)).collect());
    let line = feature(json!({
        "type": "Feature",
        "geometry": Geometry::new(GeoJsonValue::from(&line)),
        "properties": {
            "kind": "route",
            "route_index": route.route_index,
            "rank": rank,
            "stroke": line_color(route.congestion_level, rank),
            "stroke-width": STROKE_WIDTH,
            "stroke-opacity": STROKE_OPACITY,
            "popup": route_popup(route),
            "total_distance_km": route.total_distance_km,
            "estimated_time_min": route.estimated_time_min,
            "congestion_level": route.congestion_level,
            "route_quality": route.route_quality,
        }
    }))?;

    let start = marker(first, "start", START_MARKER_COLOR, "play", &route.start_location, route.mode)?;
    let end = marker(last, "end", END_MARKER_COLOR, "stop", &route.end_location, route.mode)?;

    let mut foreign_members = serde_json::Map::new();
    foreign_members.insert("center".into(), json!([first.lon, first.lat]));
    foreign_members.insert("zoom".into(), json!(ZOOM));

    Ok(FeatureCollection {
        features:        vec![line, start, end],
        bbox:            None,
        foreign_members: Some(foreign_members),
    })
}

/// Deterministic map filename: `route_<start>_<end>_<mode>_<rank>.geojson`
/// with both location names slugified.
pub fn map_filename(start: &str, end: &str, mode: TravelMode, rank: usize) -> String {
    format!("route_{}_{}_{mode}_{rank}.geojson", slugify(start), slugify(end))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn to_coord(p: GeoPoint) -> Coord<f64> {
    Coord { x: p.lon, y: p.lat }
}

fn marker(
    at:       GeoPoint,
    kind:     &str,
    color:    &str,
    symbol:   &str,
    location: &str,
    mode:     TravelMode,
) -> ExportResult<Feature> {
    let label = if kind == "start" { "Start" } else { "End" };
    feature(json!({
        "type": "Feature",
        "geometry": Geometry::new(GeoJsonValue::from(&Point::from(to_coord(at)))),
        "properties": {
            "kind": kind,
            "marker-color": color,
            "marker-symbol": symbol,
            "popup": format!("{label}: {location} ({mode})"),
        }
    }))
}

fn feature(value: serde_json::Value) -> ExportResult<Feature> {
    serde_json::from_value::<Feature>(value).map_err(|e| ExportError::GeoJson(e.to_string()))
}

fn is_plain_filename(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}

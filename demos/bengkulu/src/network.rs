//! Synthetic Bengkulu street grid.
//!
//! A 12 × 10 grid of intersections roughly covering the city centre
//! (about 8 km north-south, 5.5 km east-west).  Every third row and column
//! is an arterial; the rest are residential streets.  The walkable graph
//! adds a footpath along the coast (the western column).

use rr_core::{GeoPoint, NetworkKind};
use rr_network::{RawEdge, RawGraph, RawNode, RawSpeed};

const ROWS:    usize = 12;
const COLS:    usize = 10;
const ORIGIN:  GeoPoint = GeoPoint { lat: -3.830, lon: 102.240 };
const DLAT:    f64 = 0.007;
const DLON:    f64 = 0.006;

fn node_id(row: usize, col: usize) -> i64 {
    1_000 + (row * COLS + col) as i64
}

fn position(row: usize, col: usize) -> GeoPoint {
    GeoPoint::new(ORIGIN.lat + row as f64 * DLAT, ORIGIN.lon + col as f64 * DLON)
}

fn highway(kind: NetworkKind, row: usize, col: usize, horizontal: bool) -> &'static str {
    let arterial = if horizontal { row % 3 == 0 } else { col % 3 == 0 };
    match (kind, arterial) {
        (NetworkKind::Drive, true) => if horizontal { "primary" } else { "secondary" },
        (NetworkKind::Drive, false) => "residential",
        (NetworkKind::Walk, _) if col == 0 && !horizontal => "footway",
        (NetworkKind::Walk, true) => "tertiary",
        (NetworkKind::Walk, false) => "residential",
    }
}

fn push_road(graph: &mut RawGraph, kind: NetworkKind, a: (usize, usize), b: (usize, usize), horizontal: bool) {
    let (ua, ub) = (node_id(a.0, a.1), node_id(b.0, b.1));
    let length_m = position(a.0, a.1).distance_m(position(b.0, b.1));
    let class = highway(kind, a.0, a.1, horizontal);
    let speed = match class {
        "primary" => Some(RawSpeed::Text("60 km/h".into())),
        "secondary" => Some(RawSpeed::Number(50.0)),
        _ => None,
    };

    for (u, v) in [(ua, ub), (ub, ua)] {
        let mut edge = RawEdge::new(u, v, length_m).with_highway(class);
        if let Some(speed) = &speed {
            edge = edge.with_maxspeed(speed.clone());
        }
        graph.edges.push(edge);
    }
}

/// Raw graph of `kind`, as a graph provider would deliver it.
pub fn bengkulu_grid(kind: NetworkKind) -> RawGraph {
    let mut graph = RawGraph::default();
    for row in 0..ROWS {
        for col in 0..COLS {
            let p = position(row, col);
            graph.nodes.push(RawNode::new(node_id(row, col), p.lat, p.lon));
        }
    }
    for row in 0..ROWS {
        for col in 0..COLS {
            if col + 1 < COLS {
                push_road(&mut graph, kind, (row, col), (row, col + 1), true);
            }
            if row + 1 < ROWS {
                push_road(&mut graph, kind, (row, col), (row + 1, col), false);
            }
        }
    }
    graph
}

//! Penalty-based alternative paths.
//!
//! Candidate `i` (0-based) is the shortest path on a private copy of the
//! weights in which every edge of the *base* path is multiplied by
//! `1.2 + 0.2·i`.  Candidates are independent of one another, so penalties
//! never compound, and with the `parallel` feature they are computed on the
//! Rayon pool.  A candidate is kept only if its node sequence differs from
//! the base path and from every candidate kept before it; the result order
//! is always candidate order.

use log::debug;

use rr_core::NodeId;
use rr_network::{EdgeWeights, RoadNetwork};

use crate::astar::{Path, shortest_path};

/// Penalty of candidate 0.
pub const BASE_PENALTY: f64 = 1.2;

/// Penalty increase per candidate index.
pub const PENALTY_STEP: f64 = 0.2;

/// Weight multiplier for candidate `index`.
#[inline]
pub fn penalty_factor(index: usize) -> f64 {
    BASE_PENALTY + index as f64 * PENALTY_STEP
}

/// Up to `count - 1` paths from `base.start()` to `end`, distinct from `base`
/// and from each other.  `count <= 1` yields nothing.
pub fn k_alternatives(
    network: &RoadNetwork,
    weights: &EdgeWeights,
    base:    &Path,
    end:     NodeId,
    count:   usize,
) -> Vec<Path> {
    let candidates = count.saturating_sub(1);
    if candidates == 0 {
        return Vec::new();
    }

    let found = candidate_paths(network, weights, base, end, candidates);

    let mut accepted: Vec<Path> = Vec::with_capacity(found.len());
    for (i, candidate) in found.into_iter().enumerate() {
        let Some(path) = candidate else {
            continue;
        };
        if path.nodes == base.nodes || accepted.iter().any(|p| p.nodes == path.nodes) {
            debug!("alternative {i} (penalty {:.1}) repeats an earlier path", penalty_factor(i));
            continue;
        }
        accepted.push(path);
    }
    accepted
}

/// Penalised search for one candidate index.  `None` when the search fails,
/// which cannot happen on a copy of a graph in which `base` exists.
fn candidate(
    network: &RoadNetwork,
    weights: &EdgeWeights,
    base:    &Path,
    end:     NodeId,
    index:   usize,
) -> Option<Path> {
    let factor = penalty_factor(index);
    let mut penalised = weights.clone();
    for &edge in &base.edges {
        penalised.scale(edge, factor);
    }
    let mut path = shortest_path(network, &penalised, base.start(), end).ok()?;
    // Report cost under the real weights, not the penalised copy.
    path.cost = path.edges.iter().map(|&e| weights.get(e)).sum();
    Some(path)
}

#[cfg(not(feature = "parallel"))]
fn candidate_paths(
    network: &RoadNetwork,
    weights: &EdgeWeights,
    base:    &Path,
    end:     NodeId,
    count:   usize,
) -> Vec<Option<Path>> {
    (0..count).map(|i| candidate(network, weights, base, end, i)).collect()
}

#[cfg(feature = "parallel")]
fn candidate_paths(
    network: &RoadNetwork,
    weights: &EdgeWeights,
    base:    &Path,
    end:     NodeId,
    count:   usize,
) -> Vec<Option<Path>> {
    use rayon::prelude::*;

    (0..count)
        .into_par_iter()
        .map(|i| candidate(network, weights, base, end, i))
        .collect()
}

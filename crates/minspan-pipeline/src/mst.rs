//! Minimum spanning tree over the complete graph of a point set.
//!
//! Edge weights are squared Euclidean distances; only comparisons matter,
//! so the square root is never taken. This module defines the
//! [`SpanningTree`] trait for pluggable MST implementations and the
//! [`MstBackendKind`] enum for runtime selection.
//!
//! Every backend must produce the same edge sequence: `n - 1` edges for
//! `n >= 2` points (none otherwise), each discovered as the lightest edge
//! joining two different forests, with ties going to the first pair in
//! scan order (`i` ascending, then `j` ascending, `i <= j`).

use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};

use crate::types::{Edge, MstError, Point};

/// Selects which MST implementation to use.
///
/// Chosen once at startup; both variants satisfy the same contract and
/// return identical edges. With the `clap` feature it doubles as the
/// `--backend` value of the command-line tools (`naive`, `kruskal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum MstBackendKind {
    /// Repeated full scans of all pairs, merging one pair of forests per
    /// scan. O(n³) time, O(n) extra memory.
    #[default]
    Naive,

    /// Kruskal's algorithm over all pairs sorted by weight, with
    /// union-find. O(n² log n) time, O(n²) extra memory.
    Kruskal,
}

/// Trait for MST strategies.
///
/// Input: points indexed by position.
/// Output: spanning-tree edges in discovery order.
pub trait SpanningTree {
    /// Build the minimum spanning tree of `points`.
    fn spanning_tree(&self, points: &[Point]) -> Vec<Edge>;
}

impl SpanningTree for MstBackendKind {
    fn spanning_tree(&self, points: &[Point]) -> Vec<Edge> {
        match *self {
            Self::Naive => naive_spanning_tree(points),
            Self::Kruskal => kruskal_spanning_tree(points),
        }
    }
}

/// Greedy forest merging by exhaustive scan.
///
/// Each point starts in its own forest (`groups[i] == i`). Each round
/// scans every pair `(i, j)` with `i <= j`, keeps the strictly lightest
/// pair whose endpoints lie in different forests, emits it, and folds
/// the second endpoint's forest into the first's.
fn naive_spanning_tree(points: &[Point]) -> Vec<Edge> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }

    let mut groups: Vec<usize> = (0..n).collect();
    let mut edges = Vec::with_capacity(n - 1);

    for _ in 0..n - 1 {
        let mut best: Option<(f64, usize, usize)> = None;

        for i in 0..n {
            for j in i..n {
                if groups[i] == groups[j] {
                    continue;
                }
                let dist2 = points[i].distance_squared(points[j]);
                if best.is_none_or(|(best_dist, _, _)| dist2 < best_dist) {
                    best = Some((dist2, i, j));
                }
            }
        }

        // n - 1 merges of n singleton forests always leave a cross pair
        // to find; `let else` keeps the loop panic-free regardless.
        let Some((_, i, j)) = best else {
            break;
        };

        edges.push(Edge(i, j));
        let keep = groups[i];
        let absorb = groups[j];
        for group in &mut groups {
            if *group == absorb {
                *group = keep;
            }
        }
    }

    edges
}

/// Kruskal's algorithm over the complete graph.
///
/// Candidate pairs are generated in scan order and stably sorted by
/// weight, so equal-weight pairs keep their scan order. Accepting the
/// first cross-forest candidate each time reproduces exactly the pair
/// the naive scan would pick at that round.
fn kruskal_spanning_tree(points: &[Point]) -> Vec<Edge> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }

    let mut candidates: Vec<(f64, usize, usize)> = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in i + 1..n {
            candidates.push((points[i].distance_squared(points[j]), i, j));
        }
    }
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut forests = UnionFind::<usize>::new(n);
    let mut edges = Vec::with_capacity(n - 1);

    for (_, i, j) in candidates {
        if forests.union(i, j) {
            edges.push(Edge(i, j));
            if edges.len() == n - 1 {
                break;
            }
        }
    }

    edges
}

/// Run `backend` over a flattened coordinate buffer.
///
/// `coords` holds `x0, y0, x1, y1, …` for `coords.len() / 2` points. The
/// result holds `2 * (n - 1)` indices, two per edge, in discovery order.
/// This mirrors the narrow interface of an externally supplied MST
/// routine; the returned buffer is owned by the caller.
///
/// # Errors
///
/// Returns [`MstError::OddCoordinateCount`] if `coords` has odd length.
#[allow(clippy::cast_precision_loss)]
pub fn spanning_tree_flat(
    backend: &impl SpanningTree,
    coords: &[i64],
) -> Result<Vec<usize>, MstError> {
    if coords.len() % 2 != 0 {
        return Err(MstError::OddCoordinateCount(coords.len()));
    }

    let points: Vec<Point> = coords
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0] as f64, pair[1] as f64))
        .collect();

    Ok(backend
        .spanning_tree(&points)
        .into_iter()
        .flat_map(|Edge(a, b)| [a, b])
        .collect())
}

/// Total squared-distance weight of a set of edges.
#[must_use]
pub fn tree_weight_squared(points: &[Point], edges: &[Edge]) -> f64 {
    edges
        .iter()
        .map(|&Edge(a, b)| points[a].distance_squared(points[b]))
        .sum()
}

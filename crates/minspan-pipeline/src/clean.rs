//! Crossing removal: uncross segments of a closed path by local swaps.
//!
//! Each sweep scans every pair of non-adjacent segments
//! `(path[i], path[i+1])` and `(path[j], path[j+1])`, `j >= i + 2`,
//! indices taken modulo the path length. When a pair intersects, the
//! elements at `i + 1` and `j` trade places, a 2-opt style move that
//! reconnects `path[i]` to `path[j]` and `path[i+1]` to `path[j+1]`.
//!
//! Sweeps repeat until one finds no crossing, or until the number of
//! sweeps equals the path length. The cap guarantees termination, not a
//! clean result; [`CleanOutcome::resolved`] says which one happened.

use serde::{Deserialize, Serialize};

use crate::geometry::segments_intersect;
use crate::types::QuantizedPoint;

/// Result of [`clean_path`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanOutcome {
    /// The (possibly reordered) path.
    pub path: Vec<QuantizedPoint>,

    /// `true` if the returned path has no crossing segment pair.
    pub resolved: bool,

    /// Number of full sweeps performed.
    pub sweeps: usize,
}

/// Remove crossing segments from a closed path.
///
/// Takes ownership of the path buffer and hands it back inside the
/// [`CleanOutcome`]. Paths with fewer than four points cannot cross and
/// are returned untouched with zero sweeps.
#[must_use = "returns the cleaned path"]
pub fn clean_path(mut path: Vec<QuantizedPoint>) -> CleanOutcome {
    let n = path.len();
    if n < 4 {
        return CleanOutcome {
            path,
            resolved: true,
            sweeps: 0,
        };
    }

    let mut sweeps = 0;
    let mut resolved = false;

    while !resolved && sweeps < n {
        sweeps += 1;
        resolved = true;
        for i in 0..n {
            for j in i + 2..n {
                if is_wraparound_neighbor(i, j, n) {
                    continue;
                }
                if crosses(&path, i, j) {
                    path.swap(i + 1, j);
                    resolved = false;
                }
            }
        }
    }

    if !resolved {
        // The last capped sweep may still have left the path clean.
        resolved = !has_crossing(&path);
        tracing::debug!(sweeps, resolved, "crossing removal reached its sweep cap");
    }

    CleanOutcome {
        path,
        resolved,
        sweeps,
    }
}

/// Segment `n - 1` closes the loop back to `path[0]`, so it shares a
/// vertex with segment `0`.
const fn is_wraparound_neighbor(i: usize, j: usize, n: usize) -> bool {
    i == 0 && j == n - 1
}

/// Whether segment `i` and segment `j` of the closed path intersect.
fn crosses(path: &[QuantizedPoint], i: usize, j: usize) -> bool {
    let n = path.len();
    segments_intersect(path[i], path[(i + 1) % n], path[j], path[(j + 1) % n])
}

/// Whether any non-adjacent segment pair intersects.
fn has_crossing(path: &[QuantizedPoint]) -> bool {
    let n = path.len();
    (0..n).any(|i| (i + 2..n).any(|j| !is_wraparound_neighbor(i, j, n) && crosses(path, i, j)))
}

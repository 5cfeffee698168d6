//! Length and crossing measurements for tours and spanning trees.
//!
//! Used by diagnostics, the bench CLI, and tests that check the
//! double-tree approximation bound.

use crate::geometry::segments_intersect;
use crate::types::{Edge, Point, QuantizedPoint};

/// Length of the path when walked as an open polyline.
#[must_use]
pub fn open_length(path: &[Point]) -> f64 {
    path.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}

/// Length of the path when closed back to its first point.
///
/// Paths with fewer than two points have length zero.
#[must_use]
pub fn closed_length(path: &[Point]) -> f64 {
    match (path.first(), path.last()) {
        (Some(&first), Some(&last)) if path.len() > 1 => open_length(path) + last.distance(first),
        _ => 0.0,
    }
}

/// Total Euclidean length of a set of edges.
#[must_use]
pub fn tree_length(points: &[Point], edges: &[Edge]) -> f64 {
    edges
        .iter()
        .map(|&Edge(a, b)| points[a].distance(points[b]))
        .sum()
}

/// Count pairs of non-adjacent segments that intersect in the closed path.
///
/// Segment `k` runs from `path[k]` to `path[(k + 1) % n]`. Paths with
/// fewer than four points have no non-adjacent segment pairs.
#[must_use]
pub fn count_crossings(path: &[QuantizedPoint]) -> usize {
    let n = path.len();
    if n < 4 {
        return 0;
    }
    let mut count = 0;
    for i in 0..n {
        for j in i + 2..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_intersect(path[i], path[(i + 1) % n], path[j], path[(j + 1) % n]) {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(x: i32, y: i32) -> QuantizedPoint {
        QuantizedPoint::new(f64::from(x), f64::from(y))
    }

    #[test]
    fn empty_and_single_paths_have_zero_length() {
        assert!(closed_length(&[]).abs() < f64::EPSILON);
        assert!(closed_length(&[Point::new(3.0, 3.0)]).abs() < f64::EPSILON);
    }

    #[test]
    fn unit_square_perimeter() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ];
        assert!((open_length(&square) - 3.0).abs() < 1e-12);
        assert!((closed_length(&square) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn tree_length_sums_edges() {
        let points = [Point::new(0.0, 0.0), Point::new(3.0, 4.0), Point::new(3.0, 0.0)];
        let length = tree_length(&points, &[Edge(0, 1), Edge(1, 2)]);
        assert!((length - 9.0).abs() < 1e-12);
    }

    #[test]
    fn square_perimeter_has_no_crossings() {
        let path = [q(0, 0), q(0, 100), q(100, 100), q(100, 0)];
        assert_eq!(count_crossings(&path), 0);
    }

    #[test]
    fn bowtie_has_one_crossing() {
        let path = [q(0, 0), q(100, 100), q(100, 0), q(0, 100)];
        assert_eq!(count_crossings(&path), 1);
    }

    #[test]
    fn short_paths_cannot_cross() {
        assert_eq!(count_crossings(&[q(0, 0), q(5, 5), q(5, 0)]), 0);
    }
}

//! Point normalization: quantize onto a hundredths grid and drop
//! duplicates.
//!
//! The transform is:
//!
//! ```text
//! grid_x = trunc(x × 100)
//! grid_y = trunc(y × 100)
//! ```
//!
//! Two input points are duplicates iff their grid coordinates are equal.
//! The first occurrence wins and input order is otherwise preserved.
//! Everything after this stage (MST, walk, cleanup) runs on the grid, and
//! the finished tour is mapped back by dividing by 100.
//!
//! The quantization is lossy on purpose: precision below 0.01 is
//! discarded so that duplicate detection is exact and reproducible.

use std::collections::HashSet;

use crate::types::{Point, QuantizedPoint};

/// Quantize every point and keep only the first occurrence of each grid
/// position.
#[must_use = "returns the distinct grid points"]
pub fn quantize_distinct(points: &[Point]) -> Vec<QuantizedPoint> {
    let mut seen = HashSet::with_capacity(points.len());
    points
        .iter()
        .map(|p| p.quantize())
        .filter(|q| seen.insert(*q))
        .collect()
}

/// Map grid points back to input coordinates.
#[must_use]
pub fn dequantize_all(points: &[QuantizedPoint]) -> Vec<Point> {
    points.iter().map(|q| q.dequantize()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_returns_empty() {
        assert!(quantize_distinct(&[]).is_empty());
    }

    #[test]
    fn scales_by_one_hundred() {
        let result = quantize_distinct(&[Point::new(1.0, 2.5)]);
        assert_eq!(result, vec![QuantizedPoint::new(100.0, 250.0)]);
    }

    #[test]
    fn duplicates_keep_first_occurrence_order() {
        let points = [
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        let result = quantize_distinct(&points);
        assert_eq!(
            result,
            vec![
                QuantizedPoint::new(100.0, 100.0),
                QuantizedPoint::new(0.0, 0.0),
                QuantizedPoint::new(200.0, 0.0),
            ]
        );
    }

    #[test]
    fn points_closer_than_the_grid_merge() {
        // Both truncate to (123, 0).
        let points = [Point::new(1.231, 0.0), Point::new(1.239, 0.004)];
        assert_eq!(quantize_distinct(&points).len(), 1);
    }

    #[test]
    fn dequantize_divides_by_one_hundred() {
        let result = dequantize_all(&[QuantizedPoint::new(150.0, -25.0)]);
        assert_eq!(result, vec![Point::new(1.5, -0.25)]);
    }
}

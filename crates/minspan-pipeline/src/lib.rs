//! minspan-pipeline: approximate planar traveling-salesman tours (sans-IO).
//!
//! Turns a list of 2D points into a closed visiting order through:
//! quantize + dedup -> minimum spanning tree -> angle-guided tree walk ->
//! crossing removal -> de-quantize.
//!
//! This crate has **no I/O dependencies**. It operates on in-memory point
//! slices and returns structured data. The HTTP surface lives in
//! `minspan-serve`, the command-line harness in `minspan-bench`.

pub mod analysis;
pub mod clean;
pub mod diagnostics;
pub mod geometry;
pub mod mst;
pub mod normalize;
pub mod pipeline;
pub mod types;
pub mod walk;

pub use clean::{CleanOutcome, clean_path};
pub use mst::{MstBackendKind, SpanningTree, spanning_tree_flat};
pub use pipeline::{Pipeline, StagedTour};
pub use types::{Edge, MstError, Point, QuantizedPoint, TourConfig, TourResult};

/// Minimum spanning tree of the raw input points.
///
/// No quantization or deduplication happens here: duplicate points are
/// joined by zero-length edges. Fewer than two points yield no edges;
/// otherwise exactly `points.len() - 1` edges come back, in the order the
/// backend accepted them.
#[must_use = "returns the spanning tree edges"]
pub fn compute_mst(points: &[Point], backend: &impl SpanningTree) -> Vec<Edge> {
    let edges = backend.spanning_tree(points);
    tracing::debug!(points = points.len(), edges = edges.len(), "computed spanning tree");
    edges
}

/// Approximate a shortest closed tour through `points`.
///
/// # Steps
///
/// 1. Quantize onto a hundredths grid and drop duplicates
/// 2. Build the minimum spanning tree of the distinct grid points
/// 3. Walk the tree, always taking the sharpest left turn
/// 4. Remove crossing segments (unless `config.clean_crossings` is off)
/// 5. Map the tour back to input coordinates
///
/// Fewer than three distinct points skip steps 2-4 and come back in
/// first-seen order. The result never fails: a crossing-removal pass that
/// hits its sweep cap still returns a complete tour, flagged through
/// [`TourResult::resolved`].
#[must_use = "returns the computed tour"]
pub fn approximate_tour(points: &[Point], config: &TourConfig) -> TourResult {
    Pipeline::new(points.to_vec(), *config)
        .normalize()
        .span()
        .walk()
        .clean()
        .into_result()
        .into_tour()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::analysis::{closed_length, count_crossings, tree_length};
    use crate::normalize::quantize_distinct;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    /// Grid position of a tour point. Rounding undoes the division by
    /// the scale, where truncating again could land one step low.
    fn regrid(p: &Point) -> QuantizedPoint {
        QuantizedPoint::new(
            (p.x * types::QUANTIZE_SCALE).round(),
            (p.y * types::QUANTIZE_SCALE).round(),
        )
    }

    fn random_points(rng: &mut StdRng, n: usize) -> Vec<Point> {
        (0..n)
            .map(|_| Point::new(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0)))
            .collect()
    }

    // --- compute_mst ---

    #[test]
    fn mst_of_two_points() {
        let edges = compute_mst(&pts(&[(0.0, 0.0), (1.0, 1.0)]), &MstBackendKind::Naive);
        assert_eq!(edges, vec![Edge(0, 1)]);
    }

    #[test]
    fn mst_of_degenerate_inputs_is_empty() {
        assert!(compute_mst(&[], &MstBackendKind::Naive).is_empty());
        assert!(compute_mst(&pts(&[(0.0, 0.0)]), &MstBackendKind::Kruskal).is_empty());
    }

    #[test]
    fn mst_keeps_duplicates() {
        let points = pts(&[(0.0, 0.0), (0.0, 0.0)]);
        let edges = compute_mst(&points, &MstBackendKind::Naive);
        assert_eq!(edges, vec![Edge(0, 1)]);
        assert!(mst::tree_weight_squared(&points, &edges).abs() < f64::EPSILON);
    }

    #[test]
    fn mst_edge_count_is_n_minus_one() {
        let mut rng = StdRng::seed_from_u64(3);
        for n in 2..30 {
            let points = random_points(&mut rng, n);
            assert_eq!(compute_mst(&points, &MstBackendKind::Naive).len(), n - 1);
        }
    }

    #[test]
    fn mst_of_extreme_coordinates() {
        let huge = f64::MAX / 4.0;
        let inputs = [
            pts(&[(-1e17, -1e17), (1e17, 1e17), (-1e17, 1e17), (1e17, -1e17)]),
            pts(&[(1e17, 0.0), (2e17, 0.0), (3e17, 0.0)]),
            pts(&[(huge, 0.0), (-huge, 0.0), (0.0, huge), (0.0, -huge)]),
        ];
        for points in &inputs {
            for backend in [MstBackendKind::Naive, MstBackendKind::Kruskal] {
                let edges = compute_mst(points, &backend);
                assert_eq!(edges.len(), points.len() - 1, "{backend:?} {points:?}");
            }
        }
        let line = compute_mst(&inputs[1], &MstBackendKind::Naive);
        assert_eq!(line, vec![Edge(0, 1), Edge(1, 2)]);
    }

    // --- approximate_tour ---

    #[test]
    fn tour_of_empty_input_is_empty() {
        let tour = approximate_tour(&[], &TourConfig::default());
        assert!(tour.path.is_empty());
        assert!(tour.resolved);
    }

    #[test]
    fn tour_of_one_point() {
        let tour = approximate_tour(&pts(&[(0.0, 0.0)]), &TourConfig::default());
        assert_eq!(tour.path, pts(&[(0.0, 0.0)]));
    }

    #[test]
    fn tour_of_two_points() {
        let tour = approximate_tour(&pts(&[(0.0, 0.0), (1.0, 1.0)]), &TourConfig::default());
        assert_eq!(tour.path, pts(&[(0.0, 0.0), (1.0, 1.0)]));
        assert!(tour.resolved);
    }

    #[test]
    fn tour_drops_duplicates() {
        let tour = approximate_tour(&pts(&[(0.0, 0.0), (0.0, 0.0)]), &TourConfig::default());
        assert_eq!(tour.path, pts(&[(0.0, 0.0)]));
    }

    #[test]
    fn square_tour_follows_the_perimeter() {
        let points = pts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let tour = approximate_tour(&points, &TourConfig::default());
        assert_eq!(tour.path, pts(&[(1.0, 1.0), (0.0, 1.0), (0.0, 0.0), (1.0, 0.0)]));
        assert!(tour.resolved);
        assert!((closed_length(&tour.path) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn tour_coordinates_are_truncated_to_hundredths() {
        let tour = approximate_tour(&pts(&[(1.239, -2.001)]), &TourConfig::default());
        assert_eq!(tour.path, pts(&[(1.23, -2.0)]));
    }

    #[test]
    fn huge_bowtie_is_uncrossed() {
        let points = pts(&[(-1e17, -1e17), (1e17, 1e17), (-1e17, 1e17), (1e17, -1e17)]);
        for backend in [MstBackendKind::Naive, MstBackendKind::Kruskal] {
            let config = TourConfig {
                mst_backend: backend,
                ..TourConfig::default()
            };
            let tour = approximate_tour(&points, &config);
            assert_eq!(tour.path.len(), 4);
            for p in &points {
                assert!(tour.path.contains(p), "{p:?} missing from {:?}", tour.path);
            }
            assert!(tour.resolved);
            assert!((closed_length(&tour.path) - 8e17).abs() < 1e3);
        }
    }

    #[test]
    fn huge_distinct_points_are_not_merged() {
        let points = pts(&[(1e17, 0.0), (2e17, 0.0), (3e17, 0.0)]);
        let tour = approximate_tour(&points, &TourConfig::default());
        assert_eq!(tour.path.len(), 3);
        for p in &points {
            assert!(tour.path.contains(p), "{p:?} missing from {:?}", tour.path);
        }
    }

    #[test]
    fn coordinates_near_the_float_limit_still_give_a_tour() {
        let huge = f64::MAX / 400.0;
        let points = pts(&[
            (huge, 0.0),
            (-huge, 0.0),
            (0.0, huge),
            (0.0, -huge),
            (huge / 2.0, huge / 2.0),
        ]);
        for backend in [MstBackendKind::Naive, MstBackendKind::Kruskal] {
            let config = TourConfig {
                mst_backend: backend,
                ..TourConfig::default()
            };
            let tour = approximate_tour(&points, &config);
            assert_eq!(tour.path.len(), points.len(), "{backend:?}");
            assert!(tour.path.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        }
    }

    #[test]
    fn tour_visits_each_distinct_point_once() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in 0..60 {
            let mut points = random_points(&mut rng, n);
            // Repeat a few points so dedup has work to do.
            let repeats: Vec<Point> = points.iter().step_by(7).copied().collect();
            points.extend(repeats);

            let tour = approximate_tour(&points, &TourConfig::default());
            let expected: HashSet<QuantizedPoint> = quantize_distinct(&points).into_iter().collect();
            let got: HashSet<QuantizedPoint> = tour.path.iter().map(regrid).collect();

            assert_eq!(tour.path.len(), expected.len(), "n={n}");
            assert_eq!(got, expected, "n={n}");
        }
    }

    #[test]
    fn backends_produce_the_same_tour() {
        let mut rng = StdRng::seed_from_u64(8);
        for n in 3..40 {
            let points = random_points(&mut rng, n);
            let naive = approximate_tour(&points, &TourConfig::default());
            let kruskal = approximate_tour(
                &points,
                &TourConfig {
                    mst_backend: MstBackendKind::Kruskal,
                    ..TourConfig::default()
                },
            );
            assert_eq!(naive, kruskal, "n={n}");
        }
    }

    #[test]
    fn resolved_matches_crossing_count() {
        let mut rng = StdRng::seed_from_u64(29);
        for n in 4..50 {
            let points = random_points(&mut rng, n);
            let tour = approximate_tour(&points, &TourConfig::default());
            let grid: Vec<QuantizedPoint> = tour.path.iter().map(regrid).collect();
            assert_eq!(tour.resolved, count_crossings(&grid) == 0, "n={n}");
        }
    }

    #[test]
    fn uncleaned_tour_is_within_twice_the_tree() {
        let config = TourConfig {
            clean_crossings: false,
            ..TourConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(41);
        for n in 3..60 {
            let points = random_points(&mut rng, n);
            let staged = Pipeline::new(points, config)
                .normalize()
                .span()
                .walk()
                .clean()
                .into_result();
            let tree = tree_length(&staged.distinct_points(), &staged.edges);
            let tour = closed_length(&staged.path);
            assert!(tour <= 2.0 * tree + 1e-6, "n={n}: tour {tour} > 2 x tree {tree}");
        }
    }

    #[test]
    fn cleaned_tour_stays_near_the_tree_bound_on_average() {
        let mut rng = StdRng::seed_from_u64(57);
        let trials = 50;
        let mut ratio_sum = 0.0;
        for _ in 0..trials {
            let n = rng.random_range(5..60);
            let points = random_points(&mut rng, n);
            let staged = Pipeline::new(points, TourConfig::default())
                .normalize()
                .span()
                .walk()
                .clean()
                .into_result();
            let tree = tree_length(&staged.distinct_points(), &staged.edges);
            ratio_sum += closed_length(&staged.path) / tree;
        }
        let mean = ratio_sum / f64::from(trials);
        assert!(mean <= 2.0, "mean tour/tree ratio {mean}");
    }
}

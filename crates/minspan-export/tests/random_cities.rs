//! End-to-end: compute a tour for a fixed city set and render it.

use minspan_export::{SvgMetadata, TreeOverlay, to_svg};
use minspan_pipeline::{Pipeline, Point, TourConfig};

fn cities() -> Vec<Point> {
    // A deterministic scatter: the first 40 points of a low-discrepancy
    // sequence stretched over a 100 x 60 area.
    (1..=40)
        .map(|i| {
            let i = f64::from(i);
            Point::new((i * 0.618_034).fract() * 100.0, (i * 0.754_878).fract() * 60.0)
        })
        .collect()
}

#[test]
fn tour_and_tree_render_together() {
    let staged = Pipeline::new(cities(), TourConfig::default())
        .normalize()
        .span()
        .walk()
        .clean()
        .into_result();
    let tree_points = staged.distinct_points();

    let svg = to_svg(
        &staged.path,
        Some(TreeOverlay {
            points: &tree_points,
            edges: &staged.edges,
        }),
        &SvgMetadata {
            title: Some("cities"),
            description: Some("40 points"),
        },
    );

    assert_eq!(svg.matches("<path").count(), 1);
    assert_eq!(svg.matches("<line").count(), staged.edges.len());
    assert_eq!(staged.edges.len(), staged.path.len() - 1);
    assert!(svg.contains("<title>cities</title>"));
}

#[test]
fn tour_without_tree_renders_only_the_path() {
    let tour = minspan_pipeline::approximate_tour(&cities(), &TourConfig::default());
    let svg = to_svg(&tour.path, None, &SvgMetadata::default());
    assert_eq!(svg.matches("<path").count(), 1);
    assert!(!svg.contains("<line"));
    assert!(!svg.contains("tree-edges"));
}

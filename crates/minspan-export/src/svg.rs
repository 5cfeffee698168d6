//! SVG export serializer.
//!
//! Renders a closed tour as a single `<path>` element and, optionally, the
//! spanning tree it was derived from as a group of `<line>` elements. The
//! [`svg`] crate handles document construction, XML escaping, and path
//! data formatting.
//!
//! The `viewBox` is the bounding box of every drawn point plus a margin,
//! so input coordinates are emitted unchanged. Strokes use
//! `vector-effect="non-scaling-stroke"` to stay visible at any scale.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Description, Group, Line, Path, Title};
use svg::node::{Text, Value};

use minspan_pipeline::{Edge, Point};

/// Margin around the drawing, as a fraction of its larger extent.
const MARGIN_FRACTION: f64 = 0.05;

/// Extent used for an axis along which every point coincides.
const MIN_EXTENT: f64 = 1.0;

/// Metadata to embed in the SVG document.
///
/// Both fields are optional. When present, a `<title>` and/or `<desc>`
/// element is emitted immediately after the opening `<svg>` tag.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    ///
    /// Typically the tour configuration, so exported files are
    /// distinguishable.
    pub description: Option<&'a str>,
}

/// A spanning tree to draw underneath the tour.
#[derive(Debug, Clone, Copy)]
pub struct TreeOverlay<'a> {
    /// Vertex positions the edge indices refer to.
    pub points: &'a [Point],
    /// Tree edges as index pairs into `points`.
    pub edges: &'a [Edge],
}

/// Build an SVG path `d` attribute string for a closed tour.
///
/// Uses `M` for the first point, `L` for the rest, and `z` to close the
/// loop. Returns an empty string for tours with fewer than 2 points.
///
/// # Examples
///
/// ```
/// use minspan_pipeline::Point;
/// use minspan_export::build_path_data;
///
/// let tour = [Point::new(10.0, 20.0), Point::new(30.0, 40.0)];
/// assert_eq!(build_path_data(&tour), "M10,20 L30,40 z");
/// ```
#[must_use]
pub fn build_path_data(tour: &[Point]) -> String {
    let Some((first, rest)) = tour.split_first() else {
        return String::new();
    };
    if rest.is_empty() {
        return String::new();
    }

    let mut data = Data::new().move_to((first.x, first.y));
    for p in rest {
        data = data.line_to((p.x, p.y));
    }
    String::from(Value::from(data.close()))
}

/// Axis-aligned bounds of every point that will be drawn, as
/// `(min_x, min_y, width, height)` including the margin.
fn view_box(tour: &[Point], tree: Option<TreeOverlay<'_>>) -> (f64, f64, f64, f64) {
    let tree_points = tree.map_or(&[][..], |t| t.points);
    let mut all = tour.iter().chain(tree_points);

    let Some(first) = all.next() else {
        return (0.0, 0.0, MIN_EXTENT, MIN_EXTENT);
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in all {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let width = (max_x - min_x).max(MIN_EXTENT);
    let height = (max_y - min_y).max(MIN_EXTENT);
    let margin = width.max(height) * MARGIN_FRACTION;
    (
        min_x - margin,
        min_y - margin,
        2.0f64.mul_add(margin, width),
        2.0f64.mul_add(margin, height),
    )
}

/// Serialize a tour (and optionally its spanning tree) into an SVG
/// document string.
///
/// The tour becomes one closed `<path>`; tours with fewer than 2 points
/// produce no path. Tree edges become `<line>` elements inside
/// `<g id="tree-edges">`, drawn before the tour so the tour sits on top.
/// Edges referring to an index outside `tree.points` are skipped.
///
/// # Examples
///
/// ```
/// use minspan_pipeline::{Edge, Point};
/// use minspan_export::{SvgMetadata, TreeOverlay, to_svg};
///
/// let points = [Point::new(0.0, 0.0), Point::new(0.0, 1.0), Point::new(1.0, 1.0)];
/// let edges = [Edge(0, 1), Edge(1, 2)];
/// let metadata = SvgMetadata {
///     title: Some("triangle"),
///     ..SvgMetadata::default()
/// };
/// let svg = to_svg(&points, Some(TreeOverlay { points: &points, edges: &edges }), &metadata);
/// assert!(svg.contains("<title>triangle</title>"));
/// assert!(svg.contains("M0,0 L0,1 L1,1 z"));
/// ```
#[must_use]
pub fn to_svg(tour: &[Point], tree: Option<TreeOverlay<'_>>, metadata: &SvgMetadata<'_>) -> String {
    let (min_x, min_y, width, height) = view_box(tour, tree);
    let mut doc = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", (min_x, min_y, width, height));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(TreeOverlay { points, edges }) = tree {
        let mut group = Group::new()
            .set("id", "tree-edges")
            .set("stroke", "red")
            .set("stroke-width", 1)
            .set("vector-effect", "non-scaling-stroke");
        for &Edge(a, b) in edges {
            let (Some(from), Some(to)) = (points.get(a), points.get(b)) else {
                continue;
            };
            group = group.add(
                Line::new()
                    .set("x1", from.x)
                    .set("y1", from.y)
                    .set("x2", to.x)
                    .set("y2", to.y)
                    .set("vector-effect", "non-scaling-stroke"),
            );
        }
        doc = doc.add(group);
    }

    let d = build_path_data(tour);
    if !d.is_empty() {
        let path = Path::new()
            .set("id", "tour")
            .set("d", d)
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", 1)
            .set("vector-effect", "non-scaling-stroke");
        doc = doc.add(path);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        ]
    }

    #[test]
    fn empty_tour_has_no_path() {
        let svg = to_svg(&[], None, &SvgMetadata::default());
        assert!(!svg.contains("<path"));
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn single_point_tour_has_no_path() {
        assert!(build_path_data(&[Point::new(1.0, 1.0)]).is_empty());
        let svg = to_svg(&[Point::new(1.0, 1.0)], None, &SvgMetadata::default());
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn tour_path_is_closed() {
        let d = build_path_data(&square());
        assert_eq!(d, "M0,0 L0,10 L10,10 L10,0 z");
    }

    #[test]
    fn one_path_and_one_line_per_edge() {
        let points = square();
        let edges = [Edge(0, 1), Edge(0, 3), Edge(1, 2)];
        let svg = to_svg(
            &points,
            Some(TreeOverlay {
                points: &points,
                edges: &edges,
            }),
            &SvgMetadata::default(),
        );
        assert_eq!(svg.matches("<path").count(), 1);
        assert_eq!(svg.matches("<line").count(), 3);
        assert!(svg.contains(r#"id="tree-edges""#));
    }

    #[test]
    fn tree_is_drawn_before_the_tour() {
        let points = square();
        let edges = [Edge(0, 1)];
        let svg = to_svg(
            &points,
            Some(TreeOverlay {
                points: &points,
                edges: &edges,
            }),
            &SvgMetadata::default(),
        );
        let tree_pos = svg.find("tree-edges").unwrap_or(usize::MAX);
        let path_pos = svg.find("<path").unwrap_or(0);
        assert!(tree_pos < path_pos);
    }

    #[test]
    fn out_of_range_edges_are_skipped() {
        let points = square();
        let edges = [Edge(0, 1), Edge(2, 9)];
        let svg = to_svg(
            &points,
            Some(TreeOverlay {
                points: &points,
                edges: &edges,
            }),
            &SvgMetadata::default(),
        );
        assert_eq!(svg.matches("<line").count(), 1);
    }

    #[test]
    fn viewbox_covers_points_with_margin() {
        let (x, y, w, h) = view_box(&square(), None);
        assert!((x - -0.5).abs() < 1e-12);
        assert!((y - -0.5).abs() < 1e-12);
        assert!((w - 11.0).abs() < 1e-12);
        assert!((h - 11.0).abs() < 1e-12);
    }

    #[test]
    fn viewbox_of_collinear_points_is_not_degenerate() {
        let (_, _, w, h) = view_box(&[Point::new(0.0, 5.0), Point::new(4.0, 5.0)], None);
        assert!(w > 4.0);
        assert!(h > 0.0);
    }

    #[test]
    fn svg_has_xml_declaration() {
        let svg = to_svg(&square(), None, &SvgMetadata::default());
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn title_and_desc_emitted_when_present() {
        let metadata = SvgMetadata {
            title: Some("cities"),
            description: Some("backend=Naive"),
        };
        let svg = to_svg(&square(), None, &metadata);
        assert!(svg.contains("<title>cities</title>"));
        assert!(svg.contains("<desc>backend=Naive</desc>"));
    }

    #[test]
    fn title_and_desc_omitted_when_none() {
        let svg = to_svg(&square(), None, &SvgMetadata::default());
        assert!(!svg.contains("<title"));
        assert!(!svg.contains("<desc"));
    }

    #[test]
    fn special_characters_in_title_are_escaped() {
        let metadata = SvgMetadata {
            title: Some("a < b & c"),
            ..SvgMetadata::default()
        };
        let svg = to_svg(&square(), None, &metadata);
        assert!(svg.contains("a &lt; b &amp; c"));
    }
}

//! Shared types for the minspan tour pipeline.

use serde::{Deserialize, Serialize};

use crate::mst::MstBackendKind;

/// Number of grid steps per coordinate unit used by quantization.
///
/// A scale of 100 keeps two decimal places.
pub const QUANTIZE_SCALE: f64 = 100.0;

/// A 2D point in input coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Snap this point onto the quantization grid.
    ///
    /// Each coordinate is scaled by [`QUANTIZE_SCALE`] and truncated
    /// toward zero. The grid value stays an `f64`, so every finite scaled
    /// value keeps its own grid position; a scaled value beyond `f64::MAX`
    /// becomes an infinity.
    #[must_use]
    pub fn quantize(self) -> QuantizedPoint {
        QuantizedPoint::new(self.x * QUANTIZE_SCALE, self.y * QUANTIZE_SCALE)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// A point on the quantization grid (hundredths of a unit).
///
/// Coordinates are whole numbers held as `f64`. Equality and hashing
/// compare bit patterns, with `-0.0` folded into `0.0`, so this type is
/// what defines a duplicate point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuantizedPoint {
    /// Horizontal grid position.
    pub x: f64,
    /// Vertical grid position.
    pub y: f64,
}

impl QuantizedPoint {
    /// Create a grid point, truncating each coordinate toward zero.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: grid_value(x),
            y: grid_value(y),
        }
    }

    /// Grid coordinates as a floating-point [`Point`] (still scaled).
    #[must_use]
    pub const fn as_grid_point(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Map back to input coordinates by dividing by [`QUANTIZE_SCALE`].
    #[must_use]
    pub fn dequantize(self) -> Point {
        Point::new(self.x / QUANTIZE_SCALE, self.y / QUANTIZE_SCALE)
    }

    fn key(self) -> (u64, u64) {
        (grid_value(self.x).to_bits(), grid_value(self.y).to_bits())
    }
}

/// Truncate toward zero. Adding zero turns `-0.0` into `0.0`.
fn grid_value(v: f64) -> f64 {
    v.trunc() + 0.0
}

impl PartialEq for QuantizedPoint {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for QuantizedPoint {}

impl std::hash::Hash for QuantizedPoint {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// An undirected spanning-tree edge between two point indices.
///
/// Serializes as a two-element array `[a, b]`. The first index is never
/// greater than the second when produced by an MST backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    /// Returns `true` if `index` is one of the two endpoints.
    #[must_use]
    pub const fn touches(self, index: usize) -> bool {
        self.0 == index || self.1 == index
    }
}

/// Configuration for tour construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Which MST implementation builds the spanning tree.
    pub mst_backend: MstBackendKind,

    /// Whether to run the crossing-removal pass after the tree walk.
    pub clean_crossings: bool,
}

impl TourConfig {
    /// Default MST backend.
    pub const DEFAULT_MST_BACKEND: MstBackendKind = MstBackendKind::Naive;

    /// Crossing removal is on unless explicitly disabled.
    pub const DEFAULT_CLEAN_CROSSINGS: bool = true;

    /// The default configuration as a `const`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mst_backend: Self::DEFAULT_MST_BACKEND,
            clean_crossings: Self::DEFAULT_CLEAN_CROSSINGS,
        }
    }
}

impl Default for TourConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Output of [`approximate_tour`](crate::approximate_tour).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourResult {
    /// Distinct points in visiting order, in input coordinate scale.
    pub path: Vec<Point>,

    /// `true` when no two segments of the closed path cross.
    ///
    /// `false` means the crossing-removal pass hit its sweep cap (or was
    /// disabled) with crossings remaining. The path is still a valid tour.
    pub resolved: bool,
}

/// Errors from the flat-buffer MST interface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum MstError {
    /// The flattened coordinate buffer does not hold whole `(x, y)` pairs.
    #[error("flattened coordinates must come in (x, y) pairs, got {0} values")]
    OddCoordinateCount(usize),
}

//! Incremental pipeline: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! Unlike [`crate::approximate_tour`] which runs every stage in one call,
//! [`Pipeline`] lets the caller drive execution one step at a time:
//!
//! ```rust
//! # use minspan_pipeline::{Pipeline, Point, TourConfig};
//! let points = vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0), Point::new(1.0, 1.0)];
//! let staged = Pipeline::new(points, TourConfig::default())
//!     .normalize()
//!     .span()
//!     .walk()
//!     .clean()
//!     .into_result();
//! assert_eq!(staged.path.len(), 3);
//! ```
//!
//! Each stage method consumes `self` and returns the next pipeline state,
//! carrying all previously computed intermediates.
//!
//! Inputs with fewer than three distinct grid points skip the tree:
//! [`Normalized::span`] produces no edges and [`Spanned::walk`] keeps the
//! distinct points in input order.

use serde::{Deserialize, Serialize};

use crate::analysis::count_crossings;
use crate::clean::{CleanOutcome, clean_path};
use crate::mst::SpanningTree;
use crate::normalize::{dequantize_all, quantize_distinct};
use crate::types::{Edge, Point, QuantizedPoint, TourConfig, TourResult};
use crate::walk::walk_tree;

/// Below this many distinct points the input order is already a tour.
pub const MIN_POINTS_FOR_TREE: usize = 3;

/// Entry point for stage-by-stage execution.
pub struct Pipeline;

impl Pipeline {
    /// Create a pipeline over `points` with the given configuration.
    #[allow(clippy::new_ret_no_self)]
    pub const fn new(points: Vec<Point>, config: TourConfig) -> Pending {
        Pending {
            config,
            input: points,
        }
    }
}

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing has occurred.
#[must_use = "pipeline stages are consumed by advancing; call .normalize() to continue"]
pub struct Pending {
    config: TourConfig,
    input: Vec<Point>,
}

impl Pending {
    /// The raw input points.
    #[must_use]
    pub fn input(&self) -> &[Point] {
        &self.input
    }

    /// Quantize and deduplicate, advancing to [`Normalized`].
    pub fn normalize(self) -> Normalized {
        let distinct = quantize_distinct(&self.input);
        tracing::debug!(
            input = self.input.len(),
            distinct = distinct.len(),
            "normalized points",
        );
        Normalized {
            config: self.config,
            input: self.input,
            distinct,
        }
    }
}

// ───────────────────────── Stage 1: Normalized ──────────────────────────

/// Pipeline state after quantization and deduplication.
#[must_use = "pipeline stages are consumed by advancing; call .span() to continue"]
pub struct Normalized {
    config: TourConfig,
    input: Vec<Point>,
    distinct: Vec<QuantizedPoint>,
}

impl Normalized {
    /// The distinct grid points, in first-seen order.
    #[must_use]
    pub fn distinct(&self) -> &[QuantizedPoint] {
        &self.distinct
    }

    /// Build the spanning tree of the distinct grid points, advancing to
    /// [`Spanned`].
    pub fn span(self) -> Spanned {
        let edges = if self.distinct.len() < MIN_POINTS_FOR_TREE {
            Vec::new()
        } else {
            let grid: Vec<Point> = self.distinct.iter().map(|q| q.as_grid_point()).collect();
            self.config.mst_backend.spanning_tree(&grid)
        };
        tracing::debug!(
            backend = ?self.config.mst_backend,
            edges = edges.len(),
            "built spanning tree",
        );
        Spanned {
            config: self.config,
            input: self.input,
            distinct: self.distinct,
            edges,
        }
    }
}

// ───────────────────────── Stage 2: Spanned ──────────────────────────

/// Pipeline state after building the spanning tree.
#[must_use = "pipeline stages are consumed by advancing; call .walk() to continue"]
pub struct Spanned {
    config: TourConfig,
    input: Vec<Point>,
    distinct: Vec<QuantizedPoint>,
    edges: Vec<Edge>,
}

impl Spanned {
    /// Spanning-tree edges over indices into [`Normalized::distinct`].
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Walk the tree into a visiting order, advancing to [`Walked`].
    pub fn walk(self) -> Walked {
        let order = if self.distinct.len() < MIN_POINTS_FOR_TREE {
            (0..self.distinct.len()).collect()
        } else {
            walk_tree(&self.distinct, &self.edges)
        };
        let walked: Vec<QuantizedPoint> = order.iter().map(|&i| self.distinct[i]).collect();
        tracing::debug!(visited = order.len(), "walked spanning tree");
        Walked {
            config: self.config,
            input: self.input,
            distinct: self.distinct,
            edges: self.edges,
            order,
            walked,
        }
    }
}

// ───────────────────────── Stage 3: Walked ──────────────────────────

/// Pipeline state after the tree walk.
#[must_use = "pipeline stages are consumed by advancing; call .clean() to continue"]
pub struct Walked {
    config: TourConfig,
    input: Vec<Point>,
    distinct: Vec<QuantizedPoint>,
    edges: Vec<Edge>,
    order: Vec<usize>,
    walked: Vec<QuantizedPoint>,
}

impl Walked {
    /// Visiting order as indices into the distinct points.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Grid points in visiting order, before crossing removal.
    #[must_use]
    pub fn walked(&self) -> &[QuantizedPoint] {
        &self.walked
    }

    /// Remove crossings (unless disabled), advancing to [`Cleaned`].
    pub fn clean(self) -> Cleaned {
        let outcome = if self.config.clean_crossings {
            clean_path(self.walked.clone())
        } else {
            let resolved = count_crossings(&self.walked) == 0;
            CleanOutcome {
                path: self.walked.clone(),
                resolved,
                sweeps: 0,
            }
        };
        tracing::debug!(
            enabled = self.config.clean_crossings,
            sweeps = outcome.sweeps,
            resolved = outcome.resolved,
            "removed crossings",
        );
        Cleaned {
            config: self.config,
            input: self.input,
            distinct: self.distinct,
            edges: self.edges,
            order: self.order,
            walked: self.walked,
            outcome,
        }
    }
}

// ───────────────────────── Stage 4: Cleaned ──────────────────────────

/// Final pipeline state.
#[must_use = "call .into_result() to take the finished tour"]
pub struct Cleaned {
    config: TourConfig,
    input: Vec<Point>,
    distinct: Vec<QuantizedPoint>,
    edges: Vec<Edge>,
    order: Vec<usize>,
    walked: Vec<QuantizedPoint>,
    outcome: CleanOutcome,
}

impl Cleaned {
    /// The crossing-removal outcome on grid coordinates.
    #[must_use]
    pub const fn outcome(&self) -> &CleanOutcome {
        &self.outcome
    }

    /// Consume the pipeline and return every intermediate together with
    /// the de-quantized tour.
    #[must_use]
    pub fn into_result(self) -> StagedTour {
        let path = dequantize_all(&self.outcome.path);
        StagedTour {
            config: self.config,
            input: self.input,
            distinct: self.distinct,
            edges: self.edges,
            order: self.order,
            walked: self.walked,
            sweeps: self.outcome.sweeps,
            resolved: self.outcome.resolved,
            path,
        }
    }
}

/// Every intermediate of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedTour {
    /// Configuration used for this run.
    pub config: TourConfig,
    /// Raw input points.
    pub input: Vec<Point>,
    /// Distinct grid points in first-seen order.
    pub distinct: Vec<QuantizedPoint>,
    /// Spanning-tree edges over `distinct` (empty below three points).
    pub edges: Vec<Edge>,
    /// Walk order as indices into `distinct`.
    pub order: Vec<usize>,
    /// Grid points in walk order, before crossing removal.
    pub walked: Vec<QuantizedPoint>,
    /// Crossing-removal sweeps performed.
    pub sweeps: usize,
    /// Whether the final path is free of crossings.
    pub resolved: bool,
    /// Final tour in input coordinate scale.
    pub path: Vec<Point>,
}

impl StagedTour {
    /// Distinct points mapped back to input coordinates.
    #[must_use]
    pub fn distinct_points(&self) -> Vec<Point> {
        dequantize_all(&self.distinct)
    }

    /// Drop the intermediates, keeping the tour and its resolution flag.
    #[must_use]
    pub fn into_tour(self) -> TourResult {
        TourResult {
            path: self.path,
            resolved: self.resolved,
        }
    }
}

//! Tour diagnostics: timing, counts, and tour quality for each stage.
//!
//! [`approximate_tour_with_diagnostics`] drives the staged
//! [`Pipeline`](crate::Pipeline) and records one [`StageDiagnostics`] per
//! stage. Timestamps come from a caller-supplied [`Clock`] so the crate
//! itself stays free of platform timing assumptions; [`WebClock`] is the
//! ready-made implementation backed by the `web-time` crate
//! (`performance.now()` on WASM, `std::time::Instant` on native).
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::{closed_length, tree_length};
use crate::pipeline::{Pipeline, StagedTour};
use crate::types::{Point, TourConfig};

/// Source of timestamps for stage timing.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Capture the current instant.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// [`Clock`] backed by [`web_time::Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WebClock;

impl Clock for WebClock {
    type Instant = web_time::Instant;

    fn now(&self) -> web_time::Instant {
        web_time::Instant::now()
    }

    fn elapsed(&self, since: &web_time::Instant) -> Duration {
        since.elapsed()
    }
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single tour computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourDiagnostics {
    /// Stage 1: quantization and deduplication.
    pub normalize: StageDiagnostics,
    /// Stage 2: spanning tree construction.
    pub span: StageDiagnostics,
    /// Stage 3: tree walk.
    pub walk: StageDiagnostics,
    /// Stage 4: crossing removal (only when `config.clean_crossings == true`).
    pub clean: Option<StageDiagnostics>,
    /// Total wall-clock duration of the whole computation (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary of the finished tour.
    pub summary: TourSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Quantization metrics.
    Normalize {
        /// Points received.
        input_count: usize,
        /// Distinct grid points kept.
        distinct_count: usize,
    },
    /// Spanning tree metrics.
    Span {
        /// Which backend built the tree.
        backend: String,
        /// Number of tree edges.
        edge_count: usize,
        /// Total tree length in grid units.
        tree_length: f64,
    },
    /// Tree walk metrics.
    Walk {
        /// Vertices in the walk order.
        visited: usize,
        /// Closed tour length in grid units.
        tour_length: f64,
    },
    /// Crossing removal metrics.
    Clean {
        /// Sweeps performed.
        sweeps: usize,
        /// Whether every crossing was removed.
        resolved: bool,
        /// Closed tour length in grid units after cleaning.
        tour_length: f64,
    },
}

/// High-level summary of the finished tour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourSummary {
    /// Points received.
    pub input_count: usize,
    /// Points in the final tour.
    pub tour_point_count: usize,
    /// Spanning tree length in input units.
    pub tree_length: f64,
    /// Closed tour length in input units.
    pub tour_length: f64,
    /// `tour_length / tree_length`; at most 2.0 for an uncleaned walk.
    pub tree_ratio: f64,
    /// Whether the final tour is free of crossings.
    pub resolved: bool,
}

/// Run every stage, timing each one with `clock`.
///
/// Returns the staged result alongside its diagnostics.
pub fn approximate_tour_with_diagnostics<C: Clock>(
    points: &[Point],
    config: &TourConfig,
    clock: &C,
) -> (StagedTour, TourDiagnostics) {
    let total_start = clock.now();

    let start = clock.now();
    let normalized = Pipeline::new(points.to_vec(), *config).normalize();
    let normalize = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Normalize {
            input_count: points.len(),
            distinct_count: normalized.distinct().len(),
        },
    };

    let grid: Vec<Point> = normalized
        .distinct()
        .iter()
        .map(|q| q.as_grid_point())
        .collect();

    let start = clock.now();
    let spanned = normalized.span();
    let span_duration = clock.elapsed(&start);
    let grid_tree_length = tree_length(&grid, spanned.edges());
    let span = StageDiagnostics {
        duration: span_duration,
        metrics: StageMetrics::Span {
            backend: format!("{:?}", config.mst_backend),
            edge_count: spanned.edges().len(),
            tree_length: grid_tree_length,
        },
    };

    let start = clock.now();
    let walked = spanned.walk();
    let walk_duration = clock.elapsed(&start);
    let walk_tour: Vec<Point> = walked.walked().iter().map(|q| q.as_grid_point()).collect();
    let walk = StageDiagnostics {
        duration: walk_duration,
        metrics: StageMetrics::Walk {
            visited: walked.order().len(),
            tour_length: closed_length(&walk_tour),
        },
    };

    let start = clock.now();
    let cleaned = walked.clean();
    let clean_duration = clock.elapsed(&start);
    let clean = config.clean_crossings.then(|| {
        let outcome = cleaned.outcome();
        let cleaned_tour: Vec<Point> = outcome.path.iter().map(|q| q.as_grid_point()).collect();
        StageDiagnostics {
            duration: clean_duration,
            metrics: StageMetrics::Clean {
                sweeps: outcome.sweeps,
                resolved: outcome.resolved,
                tour_length: closed_length(&cleaned_tour),
            },
        }
    });

    let staged = cleaned.into_result();
    let total_duration = clock.elapsed(&total_start);

    let summary_tree_length = tree_length(&staged.distinct_points(), &staged.edges);
    let summary_tour_length = closed_length(&staged.path);
    let summary = TourSummary {
        input_count: points.len(),
        tour_point_count: staged.path.len(),
        tree_length: summary_tree_length,
        tour_length: summary_tour_length,
        tree_ratio: ratio(summary_tour_length, summary_tree_length),
        resolved: staged.resolved,
    };

    (
        staged,
        TourDiagnostics {
            normalize,
            span,
            walk,
            clean,
            total_duration,
            summary,
        },
    )
}

impl TourDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Tour Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Points: {} in, {} in tour",
            self.summary.input_count, self.summary.tour_point_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);

        let mut stages = vec![
            ("Normalize", &self.normalize),
            ("Spanning Tree", &self.span),
            ("Walk", &self.walk),
        ];
        if let Some(ref clean) = self.clean {
            stages.push(("Clean", clean));
        }

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Tree length: {:.3}  |  Tour length: {:.3}  |  Ratio: {:.3}  |  Resolved: {}",
            self.summary.tree_length,
            self.summary.tour_length,
            self.summary.tree_ratio,
            self.summary.resolved,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// `numerator / denominator`, or zero for an empty tree.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Normalize {
            input_count,
            distinct_count,
        } => format!("{input_count} -> {distinct_count} distinct"),
        StageMetrics::Span {
            backend,
            edge_count,
            tree_length,
        } => format!("{backend} {edge_count} edges, length={tree_length:.1}"),
        StageMetrics::Walk {
            visited,
            tour_length,
        } => format!("{visited} visited, length={tour_length:.1}"),
        StageMetrics::Clean {
            sweeps,
            resolved,
            tour_length,
        } => format!("{sweeps} sweeps, resolved={resolved}, length={tour_length:.1}"),
    }
}

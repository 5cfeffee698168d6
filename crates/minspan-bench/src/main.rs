//! minspan-bench: CLI tool for tour construction experiments and diagnostics.
//!
//! Runs the tour pipeline on a JSON point file with configurable
//! parameters, printing per-stage diagnostics. Useful for:
//!
//! - Comparing MST backends (`naive` vs `kruskal`)
//! - Measuring what crossing removal costs and what it buys
//! - Checking tour length against the spanning-tree bound
//!
//! The input file holds either a bare list `[[x, y], ...]` or an object
//! `{"points": [[x, y], ...]}`.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin minspan-bench -- [OPTIONS] <POINTS_JSON>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use minspan_pipeline::diagnostics::{Clock, TourDiagnostics};
use minspan_pipeline::{MstBackendKind, Point, StagedTour, TourConfig};
use serde::Deserialize;

/// Tour construction experiments and diagnostics for minspan.
///
/// Builds an approximate tour for the points in a JSON file and prints
/// per-stage timing, tree and tour lengths.
#[derive(Parser)]
#[command(name = "minspan-bench", version)]
struct Cli {
    /// Path to the input JSON point file.
    points_path: PathBuf,

    /// Spanning tree backend.
    #[arg(long, value_enum, default_value_t = TourConfig::DEFAULT_MST_BACKEND)]
    backend: MstBackendKind,

    /// Skip the crossing-removal pass.
    #[arg(long)]
    no_clean: bool,

    /// Write SVG output (tour over spanning tree) to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,

    /// Full tour config as a JSON string.
    ///
    /// When provided, `--backend` and `--no-clean` are ignored. The JSON
    /// must be a valid `TourConfig` serialization; missing fields take
    /// their defaults.
    #[arg(long)]
    config_json: Option<String>,
}

/// Accepted point file layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum PointFile {
    /// `[[x, y], ...]`
    Bare(Vec<[f64; 2]>),
    /// `{"points": [[x, y], ...]}`
    Wrapped { points: Vec<[f64; 2]> },
}

impl PointFile {
    fn into_points(self) -> Vec<Point> {
        let (Self::Bare(raw) | Self::Wrapped { points: raw }) = self;
        raw.into_iter().map(Point::from).collect()
    }
}

/// Build a [`TourConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_cli(cli: &Cli) -> anyhow::Result<TourConfig> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).context("Error parsing --config-json");
    }

    Ok(TourConfig {
        mst_backend: cli.backend,
        clean_crossings: !cli.no_clean,
    })
}

/// Read and parse the point file.
fn load_points(path: &Path) -> anyhow::Result<Vec<Point>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Error reading {}", path.display()))?;
    let file: PointFile = serde_json::from_str(&text)
        .with_context(|| format!("Error parsing points from {}", path.display()))?;
    Ok(file.into_points())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let points = match load_points(&cli.points_path) {
        Ok(points) => points,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!(
        "Points: {} ({} points)",
        cli.points_path.display(),
        points.len(),
    );
    eprintln!("Config: {config:#?}");
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let mut all_diagnostics = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        let (staged, diagnostics) =
            minspan_pipeline::diagnostics::approximate_tour_with_diagnostics(
                &points, &config, &StdClock,
            );

        if cli.json {
            match serde_json::to_string_pretty(&diagnostics) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing diagnostics: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{}", diagnostics.report());
        }

        // Write SVG on the first run only.
        if run == 0
            && let Some(ref svg_path) = cli.svg
            && let Err(e) = write_svg(&cli.points_path, svg_path, &staged)
        {
            eprintln!("{e:#}");
        }

        all_diagnostics.push(diagnostics);

        if cli.runs > 1 {
            eprintln!();
        }
    }

    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    ExitCode::SUCCESS
}

/// Render the tour over its spanning tree and write it to `svg_path`.
fn write_svg(points_path: &Path, svg_path: &Path, staged: &StagedTour) -> anyhow::Result<()> {
    let title = points_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("bench");
    let desc = format!("{:?}", staged.config);
    let metadata = minspan_export::SvgMetadata {
        title: Some(title),
        description: Some(&desc),
    };
    let tree_points = staged.distinct_points();
    let svg = minspan_export::to_svg(
        &staged.path,
        Some(minspan_export::TreeOverlay {
            points: &tree_points,
            edges: &staged.edges,
        }),
        &metadata,
    );
    std::fs::write(svg_path, &svg)
        .with_context(|| format!("Error writing SVG to {}", svg_path.display()))?;
    eprintln!(
        "SVG written to {} ({} bytes)",
        svg_path.display(),
        svg.len(),
    );
    Ok(())
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

/// Function pointer type for extracting a stage duration from diagnostics.
type StageExtractor = fn(&TourDiagnostics) -> Option<Duration>;

/// Print aggregated statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[TourDiagnostics]) {
    debug_assert!(!all_diagnostics.is_empty(), "no diagnostics to summarize");

    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    if all_diagnostics.is_empty() {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    println!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    println!();
    println!("{:<24} {:>12}", "Stage", "Mean (ms)");
    println!("{}", "-".repeat(40));

    let stage_extractors: &[(&str, StageExtractor)] = &[
        ("Normalize", |d| Some(d.normalize.duration)),
        ("Spanning Tree", |d| Some(d.span.duration)),
        ("Walk", |d| Some(d.walk.duration)),
        ("Clean", |d| d.clean.as_ref().map(|s| s.duration)),
    ];

    for (name, extractor) in stage_extractors {
        let stage_durations: Vec<f64> = all_diagnostics
            .iter()
            .filter_map(extractor)
            .map(|dur| dur.as_secs_f64() * 1000.0)
            .collect();

        if stage_durations.is_empty() {
            continue;
        }

        let stage_mean = stage_durations.iter().sum::<f64>() / stage_durations.len() as f64;
        println!("{name:<24} {stage_mean:>10.3}ms");
    }
}

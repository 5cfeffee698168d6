//! minspan-serve: HTTP front end for the tour pipeline.
//!
//! Routes:
//!
//! - `GET /ping`: liveness check, empty `200`.
//! - `GET|POST /min_span`: `{"points": [[x, y], ...]}` in,
//!   `{"edges": [[i, j], ...]}` out. Raw points, duplicates included.
//! - `GET|POST /traveling_salesman`: same body in,
//!   `{"path": [[x, y], ...], "resolved": bool}` out.
//!
//! The pipeline is CPU-bound and synchronous, so every computation runs
//! on tokio's blocking pool.

pub mod error;
pub mod validate;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use minspan_pipeline::{Edge, MstBackendKind, TourConfig};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ErrorResponse};

/// Default cap on points per request.
pub const DEFAULT_MAX_POINTS: usize = 1000;

/// Backend used unless `--mst-backend` says otherwise. Kruskal returns the
/// same edges as the naive scan, in O(n² log n) instead of O(n³).
pub const DEFAULT_MST_BACKEND: MstBackendKind = MstBackendKind::Kruskal;

/// Server configuration, read from the command line.
#[derive(Debug, Clone, Parser)]
#[command(name = "minspan-serve", version)]
pub struct ServeConfig {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// Spanning tree backend used by both endpoints.
    #[arg(long, value_enum, default_value_t = DEFAULT_MST_BACKEND)]
    pub mst_backend: MstBackendKind,

    /// Largest point list accepted per request.
    #[arg(long, default_value_t = DEFAULT_MAX_POINTS)]
    pub max_points: usize,
}

/// Shared, read-only request context, built once at startup.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration for `/traveling_salesman`; its backend also serves
    /// `/min_span`.
    pub tour_config: TourConfig,
    /// Largest point list accepted per request.
    pub max_points: usize,
}

impl AppState {
    /// State for the given configuration.
    #[must_use]
    pub fn from_config(config: &ServeConfig) -> Self {
        Self {
            tour_config: TourConfig {
                mst_backend: config.mst_backend,
                ..TourConfig::default()
            },
            max_points: config.max_points,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            tour_config: TourConfig {
                mst_backend: DEFAULT_MST_BACKEND,
                ..TourConfig::default()
            },
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

/// `/min_span` response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct MinSpanResponse {
    /// Spanning tree edges as index pairs into the request's points.
    pub edges: Vec<Edge>,
}

/// `/traveling_salesman` response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct TourResponse {
    /// Distinct points in visiting order.
    pub path: Vec<[f64; 2]>,
    /// `false` if crossing removal gave up with crossings left.
    pub resolved: bool,
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/min_span", get(min_span).post(min_span))
        .route(
            "/traveling_salesman",
            get(traveling_salesman).post(traveling_salesman),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn ping() {}

async fn min_span(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<MinSpanResponse>, ApiError> {
    let points = validate::points_from_body(&body, state.max_points)?;
    let backend = state.tour_config.mst_backend;
    tracing::info!(points = points.len(), ?backend, "computing spanning tree");

    let edges = tokio::task::spawn_blocking(move || minspan_pipeline::compute_mst(&points, &backend))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(MinSpanResponse { edges }))
}

async fn traveling_salesman(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<TourResponse>, ApiError> {
    let points = validate::points_from_body(&body, state.max_points)?;
    let config = state.tour_config;
    tracing::info!(points = points.len(), ?config, "computing tour");

    let tour =
        tokio::task::spawn_blocking(move || minspan_pipeline::approximate_tour(&points, &config))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

    if !tour.resolved {
        tracing::warn!(points = tour.path.len(), "tour returned with crossings left");
    }

    Ok(Json(TourResponse {
        path: tour.path.into_iter().map(<[f64; 2]>::from).collect(),
        resolved: tour.resolved,
    }))
}

/// Bind and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be parsed or bound, or if the
/// server fails while running.
pub async fn run(config: ServeConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = Arc::new(AppState::from_config(&config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        backend = ?config.mst_backend,
        max_points = config.max_points,
        "listening",
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

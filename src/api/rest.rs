// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/` and are read-only. Cached snapshots are
// served from `AppState`; the `/live` endpoint fetches on demand.
//
// CORS is configured permissively; the API exposes public market data only.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::app_state::AppState;
use crate::market_data::{normalize_symbol, ScanInterval};
use crate::report::render_report;

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/snapshots", get(list_snapshots))
        .route("/api/v1/snapshots/:symbol", get(get_snapshot))
        .route("/api/v1/snapshots/:symbol/report", get(get_report))
        .route("/api/v1/snapshots/:symbol/live", get(live_snapshot))
        .layer(cors)
        .with_state(state)
}

fn not_cached(symbol: &str) -> Response {
    let body = serde_json::json!({ "error": format!("no snapshot cached for {symbol}") });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    server_time: i64,
    symbols: Vec<String>,
    errors: std::collections::HashMap<String, crate::app_state::ErrorRecord>,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        server_time: chrono::Utc::now().timestamp_millis(),
        symbols: state.config.symbols.clone(),
        errors: state.errors(),
    })
}

// =============================================================================
// Cached snapshots
// =============================================================================

async fn list_snapshots(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.all_snapshots())
}

async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Response {
    let symbol = normalize_symbol(&symbol);
    match state.snapshot(&symbol) {
        Some(cached) => Json(cached).into_response(),
        None => not_cached(&symbol),
    }
}

async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Response {
    let symbol = normalize_symbol(&symbol);
    match state.snapshot(&symbol) {
        Some(cached) => render_report(&cached.snapshot).into_response(),
        None => not_cached(&symbol),
    }
}

// =============================================================================
// On-demand snapshot
// =============================================================================

#[derive(Debug, Deserialize)]
struct LiveQuery {
    /// Scan cadence in minutes; defaults to the configured cadence.
    scan: Option<u32>,
}

async fn live_snapshot(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<LiveQuery>,
) -> Response {
    let scan = query
        .scan
        .map(ScanInterval::new)
        .unwrap_or_else(|| state.config.scan_interval());

    match state.service.fetch_snapshot(&symbol, scan).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "live snapshot failed");
            let body = serde_json::json!({ "error": e.to_string() });
            (StatusCode::BAD_GATEWAY, Json(body)).into_response()
        }
    }
}

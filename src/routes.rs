// HTTP routes

use crate::snapshot::SnapshotService;
use crate::version::{NAME, VERSION};
use axum::{Router, extract::State, response::IntoResponse, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
struct AppState {
    snapshot_service: Arc<SnapshotService>,
}

pub fn app(snapshot_service: Arc<SnapshotService>) -> Router {
    let state = AppState { snapshot_service };
    Router::new()
        .route("/", get(|| async { "servermon: host metrics snapshot service" })) // GET /
        .route("/version", get(version_handler)) // GET /version
        .route("/api/snapshot", get(snapshot_handler)) // GET /api/snapshot
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/snapshot — one fresh aggregation per request; the UI polls on
/// its own timer. Always 200 with per-metric availability inside the body.
async fn snapshot_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.snapshot_service.collect().await)
}

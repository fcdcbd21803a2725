use axum::{extract::State, response::Json, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use filwatch_storage::ObservationStore;

use crate::handlers::{get_cached_blocks, get_latest_blocks, ApiState};

pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/blocks/latest", get(get_latest_blocks))
        .route("/api/v1/blocks/cached", get(get_cached_blocks))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint with component status
async fn health_check(State(state): State<Arc<ApiState>>) -> Json<serde_json::Value> {
    use serde_json::json;

    let observations_recorded = state.store.observation_count().ok();
    let storage_healthy = observations_recorded.is_some();

    let status = if storage_healthy { "healthy" } else { "degraded" };

    Json(json!({
        "status": status,
        "timestamp": std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0),
        "components": {
            "scheduler": {
                "status": "healthy",
                "polling": state.scheduler.is_polling(),
                "cached_blocks": state.scheduler.latest().await.len()
            },
            "storage": {
                "status": if storage_healthy { "healthy" } else { "unhealthy" },
                "observations_recorded": observations_recorded
            }
        }
    }))
}

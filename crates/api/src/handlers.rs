use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;

use filwatch_storage::ObservationStore;
use filwatch_types::ObservationBatch;
use filwatch_watcher::{HeadScheduler, WatchError};

use crate::types::ErrorResponse;

pub struct ApiState {
    pub scheduler: Arc<HeadScheduler>,
    pub store: Arc<dyn ObservationStore>,
}

fn error_response(err: WatchError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.kind().to_string(),
            message: err.to_string(),
        }),
    )
}

/// Runs a fresh observation cycle per request, so the caller never sees data
/// older than this round-trip. The same block set may therefore be recorded
/// more than once within a poll window when callers outpace the scheduler.
pub async fn get_latest_blocks(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ObservationBatch>, (StatusCode, Json<ErrorResponse>)> {
    match state.scheduler.observe_now().await {
        Ok(batch) => Ok(Json(batch)),
        Err(e) => {
            tracing::error!("request-triggered cycle failed: {}", e);
            Err(error_response(e))
        }
    }
}

/// Returns the scheduler's cached-latest batch without triggering a cycle.
/// Empty until the first cycle succeeds.
pub async fn get_cached_blocks(State(state): State<Arc<ApiState>>) -> Json<ObservationBatch> {
    Json(state.scheduler.latest().await)
}

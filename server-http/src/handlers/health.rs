use crate::models::{HealthResponse, StatusResponse};
use crate::state::AppState;
use axum::{extract::State, Json};
use itemstore::ItemOperations;

/// GET /health
/// Liveness only; never touches the store or the cache
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        environment: state.items.environment().to_string(),
    })
}

/// GET /status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(state.items.status().await.into())
}

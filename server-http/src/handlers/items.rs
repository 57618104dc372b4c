use crate::error::ApiError;
use crate::models::{ItemResponse, WriteItemRequest, WriteItemResponse};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use itemstore::{ItemId, ItemOperations, WriteAction};
use tracing::info;

/// GET /data/{id}
pub async fn get_item(
    State(state): State<AppState>,
    path: Result<Path<ItemId>, PathRejection>,
) -> Result<Json<ItemResponse>, ApiError> {
    let Path(id) = path.map_err(|e| ApiError::bad_request(e.body_text()))?;
    info!("GET: id={}", id);

    let read = state.items.read(id).await?.ok_or(shared::Error::NotFound)?;
    Ok(Json(read.into()))
}

/// POST /data
pub async fn write_item(
    State(state): State<AppState>,
    body: Result<Json<WriteItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WriteItemResponse>), ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    info!("POST: id={}", req.id);

    let written = state.items.write(req.id, req.value).await?;
    let status = match written.action {
        WriteAction::Created => StatusCode::CREATED,
        WriteAction::Updated => StatusCode::OK,
    };

    Ok((status, Json(written.into())))
}

use crate::models::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

pub const ITEM_NOT_FOUND: &str = "item not found";

/// Error returned by handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, ITEM_NOT_FOUND)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<shared::Error> for ApiError {
    fn from(err: shared::Error) -> Self {
        match err {
            shared::Error::NotFound => Self::not_found(),
            shared::Error::Validation(msg) => Self::bad_request(msg),
            shared::Error::StoreUnavailable(msg) | shared::Error::CacheUnavailable(msg) => {
                warn!("dependency unavailable: {}", msg);
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    format!("service unavailable: {}", msg),
                )
            }
            shared::Error::Data(msg) => {
                error!("data error: {}", msg);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("data error: {}", msg))
            }
            shared::Error::Internal(msg) => {
                error!("internal error: {}", msg);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

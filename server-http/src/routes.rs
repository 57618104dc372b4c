use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;

/// The router wrapped so trailing slashes are trimmed before routing
pub type App = NormalizePath<Router>;

/// Build and configure the application router
pub fn build_router(state: AppState) -> App {
    let router = Router::new()
        // Liveness and diagnostics
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::status))
        // Item routes
        .route("/data", post(handlers::write_item))
        .route("/data/{id}", get(handlers::get_item))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    NormalizePath::trim_trailing_slash(router)
}

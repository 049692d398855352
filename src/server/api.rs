//! API route definitions

use std::sync::Arc;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{handlers, state::AppState, ServerConfig};

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": true,
            "message": "Not found. Visit /ui for the form client or /health to check API status.",
        })),
    )
}

async fn handle_405() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": true,
            "message": "Method not allowed. Check the API documentation for supported methods.",
        })),
    )
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let origin = origin
        .filter(|o| *o != "*")
        .and_then(|o| o.parse::<HeaderValue>().ok());
    let cors = match origin {
        Some(origin) => CorsLayer::new().allow_origin(origin),
        None => CorsLayer::new().allow_origin(Any),
    };
    cors.allow_methods(Any).allow_headers(Any)
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/train", post(handlers::train))
        .route("/evaluate", get(handlers::evaluate))
        .route("/predict", post(handlers::predict))
        .route("/upload-csv", post(handlers::upload_csv))
        .route("/ui", get(handlers::serve_ui))
        .fallback(handle_404)
        .method_not_allowed_fallback(handle_405)
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_upload_size))
        .layer(cors_layer(config.cors_origin.as_deref()))
        .layer(TraceLayer::new_for_http())
}

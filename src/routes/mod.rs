pub mod analysis;
pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::constants::HOME_MESSAGE;
use crate::middleware::request_id;
use crate::response::AppError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config().limits.max_body_bytes;

    let api_routes = Router::new()
        .nest("/analysis", analysis::router())
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route("/", get(home))
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .fallback(fallback_404)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}

async fn home() -> impl IntoResponse {
    Json(serde_json::json!({ "message": HOME_MESSAGE }))
}

async fn fallback_404() -> AppError {
    AppError::not_found("Not found")
}

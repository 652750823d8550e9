use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::constants::SERVICE_NAME;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .route("/metrics", get(metrics))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSecs": state.uptime_secs(),
    }))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Not ready while every analysis slot is taken.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.analysis_slots().available_permits() > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let limits = &state.config().limits;
    Json(serde_json::json!({
        "analysis": state.stats().snapshot(),
        "slots": {
            "capacity": limits.max_concurrent_analyses.max(1),
            "available": state.analysis_slots().available_permits(),
        },
        "uptimeSecs": state.uptime_secs(),
    }))
}

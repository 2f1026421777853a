use crate::state::AppState;
use axum::{extract::State, http::StatusCode};

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.lifecycle.is_shutting_down() {
        (StatusCode::SERVICE_UNAVAILABLE, "shutting down")
    } else {
        (StatusCode::OK, "OK")
    }
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 page not found")
}

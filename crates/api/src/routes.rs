use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

/// Routes of the scrape endpoint. Anything not listed answers 404.
pub fn create_api_routes(state: AppState, metrics_path: &str) -> Router {
    Router::new()
        .route(metrics_path, get(handlers::get_metrics))
        .route("/healthz", get(handlers::health_check))
        .route("/healthcheck/{probe}", get(handlers::get_probe_health))
        .fallback(handlers::not_found)
        .with_state(state)
}

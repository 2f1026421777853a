use crate::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use dns_sidecar_application::metrics::EXPOSITION_CONTENT_TYPE;
use tracing::{debug, instrument};

/// Renders the registry into a buffer before any byte reaches the socket.
#[instrument(skip(state), name = "api_get_metrics")]
pub async fn get_metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics.snapshot();
    debug!(bytes = body.len(), "Serving metrics snapshot");

    ([(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], body).into_response()
}

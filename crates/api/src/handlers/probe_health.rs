use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dns_sidecar_application::use_cases::ProbeHealth;
use serde_json::json;
use tracing::{debug, instrument};

#[instrument(skip(state), name = "api_get_probe_health")]
pub async fn get_probe_health(
    State(state): State<AppState>,
    Path(probe): Path<String>,
) -> Response {
    match state.probe_health.execute(&probe) {
        ProbeHealth::UnknownProbe => {
            debug!(probe = %probe, "Health requested for unknown probe");
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("unknown probe '{}'", probe) })),
            )
                .into_response()
        }
        ProbeHealth::Waiting => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "is_ok": false,
                "latency_seconds": 0.0,
                "result": null,
                "message": "waiting for first probe",
            })),
        )
            .into_response(),
        ProbeHealth::Reported(report) => {
            let status = if report.is_ok {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            (status, Json(report)).into_response()
        }
    }
}

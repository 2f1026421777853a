#![allow(dead_code)]

use axum::{body::Body, http::Request, Router};
use dns_sidecar_api::{create_api_routes, AppState};
use dns_sidecar_application::metrics::{
    PROBE_DNS_HEALTHY, PROBE_DNS_LAST_LATENCY_SECONDS, PROBE_DNS_LAST_RESULT, PROBE_DNS_TOTAL,
    PROBE_METRICS,
};
use dns_sidecar_application::ports::MetricsPort;
use dns_sidecar_application::services::Lifecycle;
use dns_sidecar_application::use_cases::GetProbeHealthUseCase;
use dns_sidecar_domain::ProbeResult;
use dns_sidecar_infrastructure::metrics::MetricRegistry;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub metrics: Arc<MetricRegistry>,
    pub lifecycle: Arc<Lifecycle>,
}

pub fn test_app(probes: &[&str]) -> TestApp {
    test_app_with_path(probes, "/metrics")
}

pub fn test_app_with_path(probes: &[&str], metrics_path: &str) -> TestApp {
    let metrics = Arc::new(MetricRegistry::new());
    for descriptor in PROBE_METRICS {
        descriptor.register(metrics.as_ref());
    }
    let lifecycle = Arc::new(Lifecycle::new());
    let probe_health = Arc::new(GetProbeHealthUseCase::new(
        metrics.clone(),
        probes.iter().map(|p| p.to_string()),
    ));

    let state = AppState {
        metrics: metrics.clone(),
        lifecycle: lifecycle.clone(),
        probe_health,
    };

    TestApp {
        router: create_api_routes(state, metrics_path),
        metrics,
        lifecycle,
    }
}

/// Writes what one completed probe query leaves in the registry.
pub fn record_probe(
    metrics: &MetricRegistry,
    probe: &str,
    result: ProbeResult,
    healthy: bool,
    latency_seconds: f64,
) {
    metrics.counter_inc(
        PROBE_DNS_TOTAL.name,
        &[("probe", probe), ("result", result.as_str())],
    );
    metrics.gauge_set(
        PROBE_DNS_LAST_LATENCY_SECONDS.name,
        &[("probe", probe)],
        latency_seconds,
    );
    metrics.gauge_set(
        PROBE_DNS_HEALTHY.name,
        &[("probe", probe)],
        if healthy { 1.0 } else { 0.0 },
    );
    for candidate in ProbeResult::ALL {
        metrics.gauge_set(
            PROBE_DNS_LAST_RESULT.name,
            &[("probe", probe), ("result", candidate.as_str())],
            if candidate == result { 1.0 } else { 0.0 },
        );
    }
}

pub async fn get(router: &Router, uri: &str) -> (u16, Option<String>, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes();

    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

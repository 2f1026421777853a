use crate::metrics::{
    PROBE_DNS_ERRORS_TOTAL, PROBE_DNS_HEALTHY, PROBE_DNS_LAST_LATENCY_SECONDS,
    PROBE_DNS_LAST_RESULT, PROBE_DNS_TOTAL, PROBE_LABEL, PROBE_METRICS, RESULT_LABEL,
};
use crate::ports::{DnsClientPort, MetricsPort, QueryOutcome};
use dns_sidecar_domain::{ProbeResult, ProbeSpec};
use std::sync::Arc;
use tracing::debug;

/// Use case: issue one probe query and publish its outcome
pub struct RunProbeUseCase {
    client: Arc<dyn DnsClientPort>,
    metrics: Arc<dyn MetricsPort>,
}

impl RunProbeUseCase {
    pub fn new(client: Arc<dyn DnsClientPort>, metrics: Arc<dyn MetricsPort>) -> Self {
        for descriptor in PROBE_METRICS {
            descriptor.register(metrics.as_ref());
        }
        Self { client, metrics }
    }

    pub async fn execute(&self, spec: &ProbeSpec) -> QueryOutcome {
        let outcome = self.client.probe(spec).await;
        self.record(spec, &outcome);

        debug!(
            probe = %spec.name,
            server = %spec.server,
            result = %outcome.result,
            latency_ms = outcome.latency.as_millis() as u64,
            "Probe completed"
        );

        outcome
    }

    fn record(&self, spec: &ProbeSpec, outcome: &QueryOutcome) {
        let probe = spec.name.as_str();
        let healthy = spec.expected.matches(outcome.result);

        self.metrics.counter_inc(
            PROBE_DNS_TOTAL.name,
            &[(PROBE_LABEL, probe), (RESULT_LABEL, outcome.result.as_str())],
        );
        // A zero add keeps the series visible while the probe is healthy.
        self.metrics.counter_add(
            PROBE_DNS_ERRORS_TOTAL.name,
            &[(PROBE_LABEL, probe)],
            u64::from(!healthy),
        );
        self.metrics.gauge_set(
            PROBE_DNS_LAST_LATENCY_SECONDS.name,
            &[(PROBE_LABEL, probe)],
            outcome.latency.as_secs_f64(),
        );
        self.metrics.gauge_set(
            PROBE_DNS_HEALTHY.name,
            &[(PROBE_LABEL, probe)],
            if healthy { 1.0 } else { 0.0 },
        );
        for result in ProbeResult::ALL {
            let value = if result == outcome.result { 1.0 } else { 0.0 };
            self.metrics.gauge_set(
                PROBE_DNS_LAST_RESULT.name,
                &[(PROBE_LABEL, probe), (RESULT_LABEL, result.as_str())],
                value,
            );
        }
    }
}

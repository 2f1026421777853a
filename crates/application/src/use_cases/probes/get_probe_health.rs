use crate::metrics::{
    PROBE_DNS_HEALTHY, PROBE_DNS_LAST_LATENCY_SECONDS, PROBE_DNS_LAST_RESULT, PROBE_LABEL,
    RESULT_LABEL,
};
use crate::ports::MetricsPort;
use dns_sidecar_domain::ProbeResult;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeHealthReport {
    pub is_ok: bool,
    pub latency_seconds: f64,
    pub result: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeHealth {
    UnknownProbe,
    /// Configured, but no query has completed yet.
    Waiting,
    Reported(ProbeHealthReport),
}

/// Use case: read a probe's last outcome back from the registry
pub struct GetProbeHealthUseCase {
    metrics: Arc<dyn MetricsPort>,
    probe_names: BTreeSet<String>,
}

impl GetProbeHealthUseCase {
    pub fn new(metrics: Arc<dyn MetricsPort>, probe_names: impl IntoIterator<Item = String>) -> Self {
        Self {
            metrics,
            probe_names: probe_names.into_iter().collect(),
        }
    }

    pub fn execute(&self, probe: &str) -> ProbeHealth {
        if !self.probe_names.contains(probe) {
            return ProbeHealth::UnknownProbe;
        }

        let labels = [(PROBE_LABEL, probe)];
        let Some(healthy) = self.metrics.gauge_value(PROBE_DNS_HEALTHY.name, &labels) else {
            return ProbeHealth::Waiting;
        };

        let latency_seconds = self
            .metrics
            .gauge_value(PROBE_DNS_LAST_LATENCY_SECONDS.name, &labels)
            .unwrap_or(0.0);

        let result = ProbeResult::ALL
            .iter()
            .find(|result| {
                self.metrics
                    .gauge_value(
                        PROBE_DNS_LAST_RESULT.name,
                        &[(PROBE_LABEL, probe), (RESULT_LABEL, result.as_str())],
                    )
                    .is_some_and(|value| value > 0.0)
            })
            .map(|result| result.as_str());

        ProbeHealth::Reported(ProbeHealthReport {
            is_ok: healthy > 0.0,
            latency_seconds,
            result,
        })
    }
}

//! Names and help text of every metric the sidecar publishes.

use crate::ports::{MetricKind, MetricsPort};
use dns_sidecar_domain::CacheStat;

pub const PROBE_LABEL: &str = "probe";
pub const RESULT_LABEL: &str = "result";

/// Content type of the text exposition format served on the scrape path.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

#[derive(Debug, Clone, Copy)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub kind: MetricKind,
    pub help: &'static str,
    pub label_keys: &'static [&'static str],
}

impl MetricDescriptor {
    pub fn register(&self, metrics: &dyn MetricsPort) {
        metrics.describe(self.name, self.kind, self.help, self.label_keys);
    }
}

pub const PROBE_DNS_TOTAL: MetricDescriptor = MetricDescriptor {
    name: "probe_dns_total",
    kind: MetricKind::Counter,
    help: "DNS probe queries issued, by result.",
    label_keys: &[PROBE_LABEL, RESULT_LABEL],
};

pub const PROBE_DNS_ERRORS_TOTAL: MetricDescriptor = MetricDescriptor {
    name: "probe_dns_errors_total",
    kind: MetricKind::Counter,
    help: "DNS probe queries whose result differed from the expected outcome.",
    label_keys: &[PROBE_LABEL],
};

pub const PROBE_DNS_LAST_LATENCY_SECONDS: MetricDescriptor = MetricDescriptor {
    name: "probe_dns_last_latency_seconds",
    kind: MetricKind::Gauge,
    help: "Latency of the most recent DNS probe query.",
    label_keys: &[PROBE_LABEL],
};

pub const PROBE_DNS_HEALTHY: MetricDescriptor = MetricDescriptor {
    name: "probe_dns_healthy",
    kind: MetricKind::Gauge,
    help: "1 if the most recent DNS probe query produced the expected outcome.",
    label_keys: &[PROBE_LABEL],
};

pub const PROBE_DNS_LAST_RESULT: MetricDescriptor = MetricDescriptor {
    name: "probe_dns_last_result",
    kind: MetricKind::Gauge,
    help: "1 for the result of the most recent DNS probe query, 0 for the others.",
    label_keys: &[PROBE_LABEL, RESULT_LABEL],
};

pub const DNS_CACHE_SCRAPE_ERRORS_TOTAL: MetricDescriptor = MetricDescriptor {
    name: "dns_cache_scrape_errors_total",
    kind: MetricKind::Counter,
    help: "Cache statistic queries that failed or returned an unusable answer.",
    label_keys: &[],
};

pub const PROBE_METRICS: [MetricDescriptor; 5] = [
    PROBE_DNS_TOTAL,
    PROBE_DNS_ERRORS_TOTAL,
    PROBE_DNS_LAST_LATENCY_SECONDS,
    PROBE_DNS_HEALTHY,
    PROBE_DNS_LAST_RESULT,
];

pub fn register_cache_stat(metrics: &dyn MetricsPort, stat: &CacheStat) {
    let help = format!("Cache statistic answered for {} (CHAOS TXT).", stat.query_name());
    metrics.describe(&stat.metric_name(), MetricKind::Gauge, &help, &[]);
}

mod dns_client;
mod metrics;

pub use dns_client::{DnsClientPort, QueryOutcome};
pub use metrics::{MetricKind, MetricsPort};

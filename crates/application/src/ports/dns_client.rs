use async_trait::async_trait;
use dns_sidecar_domain::{DomainError, ProbeResult, ProbeSpec};
use std::net::SocketAddr;
use std::time::Duration;

/// Classified outcome of one probe query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryOutcome {
    pub result: ProbeResult,
    pub latency: Duration,
}

impl QueryOutcome {
    pub fn new(result: ProbeResult, latency: Duration) -> Self {
        Self { result, latency }
    }
}

#[async_trait]
pub trait DnsClientPort: Send + Sync {
    /// Issues the probe's query once and classifies the reply.
    ///
    /// Returns within `spec.timeout` plus scheduling slack. Failures are
    /// folded into the result taxonomy rather than returned as errors.
    async fn probe(&self, spec: &ProbeSpec) -> QueryOutcome;

    /// Sends a CHAOS-class TXT query and returns every character string of
    /// the answer section, in order.
    async fn chaos_txt(
        &self,
        server: SocketAddr,
        name: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, DomainError>;
}

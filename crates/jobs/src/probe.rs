use dns_sidecar_application::use_cases::RunProbeUseCase;
use dns_sidecar_domain::ProbeSpec;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// One probe on its own cadence.
///
/// The next query starts `interval` after the previous one started, or
/// immediately when the previous one overran; queries never overlap and
/// missed ticks are not replayed. Cancellation is observed between queries,
/// so an in-flight query always completes (bounded by the probe timeout).
pub struct ProbeJob {
    spec: ProbeSpec,
    use_case: Arc<RunProbeUseCase>,
    start_jitter: bool,
    shutdown: CancellationToken,
}

impl ProbeJob {
    pub fn new(spec: ProbeSpec, use_case: Arc<RunProbeUseCase>) -> Self {
        Self {
            spec,
            use_case,
            start_jitter: false,
            shutdown: CancellationToken::new(),
        }
    }

    /// Delays the first query by a random fraction of the interval.
    pub fn with_start_jitter(mut self, enabled: bool) -> Self {
        self.start_jitter = enabled;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn name(&self) -> String {
        format!("probe:{}", self.spec.name)
    }

    pub fn restart_backoff(&self) -> Duration {
        self.spec.interval
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            probe = %self.spec.name,
            server = %self.spec.server,
            query = %self.spec.query_name,
            query_type = %self.spec.query_type,
            interval_secs = self.spec.interval.as_secs(),
            "ProbeJob: starting"
        );

        if self.start_jitter {
            let delay = jitter(self.spec.interval);
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!(probe = %self.spec.name, "ProbeJob: shutting down");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        loop {
            let started = Instant::now();
            self.use_case.execute(&self.spec).await;

            let wait = self.spec.interval.saturating_sub(started.elapsed());
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!(probe = %self.spec.name, "ProbeJob: shutting down");
                    break;
                }
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }
}

fn jitter(interval: Duration) -> Duration {
    let nanos = u64::try_from(interval.as_nanos()).unwrap_or(u64::MAX);
    if nanos == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos(fastrand::u64(..nanos))
}

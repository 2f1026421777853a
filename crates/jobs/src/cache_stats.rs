use dns_sidecar_application::use_cases::ScrapeCacheStatsUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Where the poller is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// Sleeping until the next tick.
    Idle,
    /// Waiting on the answer for statistic `index` of `of`.
    Scraping { index: usize, of: usize },
    Terminal,
}

pub struct CacheStatsJob {
    use_case: Arc<ScrapeCacheStatsUseCase>,
    interval: Duration,
    shutdown: CancellationToken,
    state: watch::Sender<PollerState>,
}

impl CacheStatsJob {
    pub fn new(use_case: Arc<ScrapeCacheStatsUseCase>, interval: Duration) -> Self {
        let (state, _) = watch::channel(PollerState::Idle);
        Self {
            use_case,
            interval,
            shutdown: CancellationToken::new(),
            state,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<PollerState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PollerState {
        *self.state.borrow()
    }

    pub fn name(&self) -> String {
        "cache-stats".to_string()
    }

    pub fn restart_backoff(&self) -> Duration {
        self.interval
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            server = %self.use_case.server(),
            stats = self.use_case.stats().len(),
            interval_ms = self.interval.as_millis() as u64,
            "CacheStatsJob: starting"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = interval.tick() => self.scrape_once().await,
            }
        }

        self.state.send_replace(PollerState::Terminal);
        info!("CacheStatsJob: shutting down");
    }

    async fn scrape_once(&self) {
        let report = self
            .use_case
            .execute(|index, of| {
                if self.shutdown.is_cancelled() {
                    return false;
                }
                self.state.send_replace(PollerState::Scraping { index, of });
                true
            })
            .await;

        if self.shutdown.is_cancelled() {
            return;
        }
        self.state.send_replace(PollerState::Idle);

        if report.failed > 0 {
            warn!(
                server = %self.use_case.server(),
                failed = report.failed,
                published = report.published,
                "Cache statistics scrape incomplete"
            );
        } else {
            debug!(published = report.published, "Cache statistics scraped");
        }
    }
}

use crate::metrics::{register_cache_stat, DNS_CACHE_SCRAPE_ERRORS_TOTAL};
use crate::ports::{DnsClientPort, MetricsPort};
use dns_sidecar_domain::{CacheStat, DomainError};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    pub published: usize,
    pub failed: usize,
    /// Statistics skipped because the pass was cancelled.
    pub skipped: usize,
}

/// Use case: query the cache's CHAOS statistics and republish them as gauges
pub struct ScrapeCacheStatsUseCase {
    client: Arc<dyn DnsClientPort>,
    metrics: Arc<dyn MetricsPort>,
    server: SocketAddr,
    stats: Vec<CacheStat>,
    query_timeout: Duration,
}

impl ScrapeCacheStatsUseCase {
    pub fn new(
        client: Arc<dyn DnsClientPort>,
        metrics: Arc<dyn MetricsPort>,
        server: SocketAddr,
        stats: Vec<CacheStat>,
        query_timeout: Duration,
    ) -> Self {
        DNS_CACHE_SCRAPE_ERRORS_TOTAL.register(metrics.as_ref());
        for stat in &stats {
            register_cache_stat(metrics.as_ref(), stat);
        }

        Self {
            client,
            metrics,
            server,
            stats,
            query_timeout,
        }
    }

    pub fn stats(&self) -> &[CacheStat] {
        &self.stats
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }

    /// One sequential pass over every statistic.
    ///
    /// `proceed(index, total)` runs before each query and ends the pass early
    /// by returning `false`; a query already in flight always finishes.
    pub async fn execute(&self, mut proceed: impl FnMut(usize, usize) -> bool) -> ScrapeReport {
        let mut report = ScrapeReport::default();
        let total = self.stats.len();

        for (index, stat) in self.stats.iter().enumerate() {
            if !proceed(index, total) {
                report.skipped = total - index;
                break;
            }
            match self.scrape_stat(stat).await {
                Ok(_) => report.published += 1,
                Err(_) => report.failed += 1,
            }
        }

        report
    }

    /// Queries one statistic. On success the gauge is set; on any failure
    /// the scrape-error counter is bumped and the gauge keeps its old value.
    pub async fn scrape_stat(&self, stat: &CacheStat) -> Result<f64, DomainError> {
        let answer = self
            .client
            .chaos_txt(self.server, stat.query_name(), self.query_timeout)
            .await
            .and_then(|strings| parse_stat_value(&strings));

        match answer {
            Ok(value) => {
                self.metrics.gauge_set(&stat.metric_name(), &[], value);
                debug!(stat = stat.name(), value, "Cache statistic updated");
                Ok(value)
            }
            Err(e) => {
                self.metrics
                    .counter_inc(DNS_CACHE_SCRAPE_ERRORS_TOTAL.name, &[]);
                debug!(
                    stat = stat.name(),
                    server = %self.server,
                    error = %e,
                    "Cache statistic scrape failed"
                );
                Err(e)
            }
        }
    }
}

/// Accepts exactly one TXT string holding a finite decimal number.
pub fn parse_stat_value(strings: &[String]) -> Result<f64, DomainError> {
    let [value] = strings else {
        return Err(DomainError::UnexpectedTxtAnswer(format!(
            "expected exactly one TXT string, got {}",
            strings.len()
        )));
    };

    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            DomainError::UnexpectedTxtAnswer(format!("'{}' is not a finite number", value))
        })
}

use dns_sidecar_api::AppState;
use dns_sidecar_application::ports::{DnsClientPort, MetricsPort};
use dns_sidecar_application::services::Lifecycle;
use dns_sidecar_application::use_cases::{
    GetProbeHealthUseCase, RunProbeUseCase, ScrapeCacheStatsUseCase,
};
use dns_sidecar_domain::Config;
use dns_sidecar_infrastructure::dns::HickoryDnsClient;
use dns_sidecar_infrastructure::metrics::MetricRegistry;
use std::sync::Arc;

use crate::SidecarError;

/// Everything the jobs and the scrape endpoint share.
pub struct Services {
    pub metrics: Arc<MetricRegistry>,
    pub lifecycle: Arc<Lifecycle>,
    pub run_probe: Arc<RunProbeUseCase>,
    pub scrape_cache_stats: Option<Arc<ScrapeCacheStatsUseCase>>,
    pub probe_health: Arc<GetProbeHealthUseCase>,
}

impl Services {
    pub fn new(config: &Config) -> Result<Self, SidecarError> {
        let metrics = Arc::new(MetricRegistry::new());
        let metrics_port: Arc<dyn MetricsPort> = metrics.clone();
        let client: Arc<dyn DnsClientPort> = Arc::new(HickoryDnsClient::new());

        let run_probe = Arc::new(RunProbeUseCase::new(client.clone(), metrics_port.clone()));

        let scrape_cache_stats = if config.cache.enabled {
            Some(Arc::new(ScrapeCacheStatsUseCase::new(
                client,
                metrics_port.clone(),
                config.cache.server_addr()?,
                config.active_cache_stats().to_vec(),
                config.cache.query_timeout(),
            )))
        } else {
            None
        };

        let probe_health = Arc::new(GetProbeHealthUseCase::new(
            metrics_port,
            config.probes.specs.iter().map(|spec| spec.name.clone()),
        ));

        Ok(Self {
            metrics,
            lifecycle: Arc::new(Lifecycle::new()),
            run_probe,
            scrape_cache_stats,
            probe_health,
        })
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            metrics: self.metrics.clone(),
            lifecycle: self.lifecycle.clone(),
            probe_health: self.probe_health.clone(),
        }
    }
}

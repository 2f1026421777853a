use dns_sidecar_domain::Config;
use dns_sidecar_jobs::{CacheStatsJob, JobRunner, ProbeJob};
use tokio_util::sync::CancellationToken;

use super::Services;

pub fn build_job_runner(
    config: &Config,
    services: &Services,
    shutdown: CancellationToken,
) -> JobRunner {
    let probes = config.probes.specs.iter().map(|spec| {
        ProbeJob::new(spec.clone(), services.run_probe.clone())
            .with_start_jitter(config.probes.start_jitter)
    });

    let mut runner = JobRunner::new()
        .with_probes(probes)
        .with_shutdown_token(shutdown);

    if let Some(scrape) = &services.scrape_cache_stats {
        runner = runner.with_cache_stats(CacheStatsJob::new(
            scrape.clone(),
            config.cache.poll_interval(),
        ));
    }

    runner
}

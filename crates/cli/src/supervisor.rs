//! Startup and shutdown ordering.
//!
//! Shutdown runs in this order:
//! 1. `/healthz` starts answering 503;
//! 2. jobs are cancelled and joined within the grace period less a drain
//!    reserve (in-flight queries finish or time out, nothing new is issued);
//! 3. the scrape endpoint stops accepting and drains within what is left.
//!
//! The whole sequence never outlives the grace period.
//!
//! `/metrics` stays available until step 3, so a final scrape sees the
//! frozen registry.

use dns_sidecar_domain::Config;
use dns_sidecar_infrastructure::metrics::MetricRegistry;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::di::{build_job_runner, Services};
use crate::server::{bind_web_listener, start_web_server};
use crate::SidecarError;

/// Part of the grace period held back for the scrape endpoint to drain.
const DRAIN_RESERVE: Duration = Duration::from_millis(250);

pub struct Supervisor {
    config: Config,
    services: Services,
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Supervisor {
    /// Builds every service and binds the scrape endpoint. Nothing runs yet.
    pub async fn bind(config: &Config) -> Result<Self, SidecarError> {
        let services = Services::new(config)?;
        let addr = config.server.listen_socket_addr()?;
        let listener = bind_web_listener(addr).await?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| SidecarError::Bind { addr, source })?;

        Ok(Self {
            config: config.clone(),
            services,
            listener,
            local_addr,
        })
    }

    /// Address the scrape endpoint actually listens on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The registry the scrape endpoint renders.
    pub fn metrics(&self) -> Arc<MetricRegistry> {
        self.services.metrics.clone()
    }

    /// Runs jobs and the scrape endpoint until `shutdown` resolves.
    pub async fn run_until<F, S>(self, shutdown: F) -> Result<(), SidecarError>
    where
        F: Future<Output = S>,
        S: std::fmt::Display,
    {
        let Supervisor {
            config,
            services,
            listener,
            ..
        } = self;

        let grace = config.server.shutdown_grace();
        let jobs_token = CancellationToken::new();
        let server_token = CancellationToken::new();

        info!(
            probes = config.probes.specs.len(),
            cache_stats = config.active_cache_stats().len(),
            cache_server = %config.cache.server,
            start_jitter = config.probes.start_jitter,
            "Supervisor starting"
        );
        for spec in &config.probes.specs {
            info!(probe = %spec, "Configured probe");
        }

        let running = build_job_runner(&config, &services, jobs_token.clone()).start();

        let state = services.app_state();
        let metrics_path = config.server.metrics_path.clone();
        let server_shutdown = server_token.clone();
        let mut server = tokio::spawn(async move {
            start_web_server(listener, state, &metrics_path, server_shutdown).await
        });

        tokio::select! {
            reason = shutdown => {
                info!(signal = %reason, "Shutdown requested");
            }
            outcome = &mut server => {
                jobs_token.cancel();
                running.join(grace).await;
                let e = match outcome {
                    Ok(Ok(())) => anyhow::anyhow!("scrape endpoint exited unexpectedly"),
                    Ok(Err(e)) => e,
                    Err(e) => anyhow::anyhow!("scrape endpoint task failed: {}", e),
                };
                error!(error = %e, "Scrape endpoint failed");
                return Err(SidecarError::Fatal(e));
            }
        }

        let started = Instant::now();
        services.lifecycle.begin_shutdown();
        jobs_token.cancel();

        let report = running.join(grace.saturating_sub(DRAIN_RESERVE.min(grace / 2))).await;
        if report.aborted > 0 {
            warn!(aborted = report.aborted, "Some jobs were aborted at the end of the grace period");
        }

        server_token.cancel();
        let remaining = grace.saturating_sub(started.elapsed());
        match tokio::time::timeout(remaining, &mut server).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => warn!(error = %e, "Scrape endpoint stopped with error"),
            Ok(Err(e)) => warn!(error = %e, "Scrape endpoint task failed"),
            Err(_) => {
                warn!("Scrape endpoint did not drain within grace period");
                server.abort();
            }
        }

        Ok(())
    }
}

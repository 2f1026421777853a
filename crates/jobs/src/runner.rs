use crate::{CacheStatsJob, ProbeJob};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{AbortHandle, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub trait SpawnableJob: Send + Sync + 'static {
    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn name(&self) -> String;
    fn restart_backoff(&self) -> Duration;
    fn start_job(self: Arc<Self>) -> JoinHandle<()>;
}

macro_rules! impl_spawnable_job {
    ($t:ty) => {
        impl SpawnableJob for $t {
            fn with_cancellation(self, token: CancellationToken) -> Self {
                self.with_cancellation(token)
            }

            fn name(&self) -> String {
                self.name()
            }

            fn restart_backoff(&self) -> Duration {
                self.restart_backoff()
            }

            fn start_job(self: Arc<Self>) -> JoinHandle<()> {
                tokio::spawn(async move { self.start().await })
            }
        }
    };
}

impl_spawnable_job!(ProbeJob);
impl_spawnable_job!(CacheStatsJob);

/// Aborts the wrapped task when the supervisor itself is aborted.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Runs `job` until it returns on its own. A panic is logged and the job is
/// started again after its backoff, unless shutdown arrives first.
async fn supervise<J: SpawnableJob>(job: Arc<J>, shutdown: CancellationToken) {
    let name = job.name();
    loop {
        let handle = Arc::clone(&job).start_job();
        let _guard = AbortOnDrop(handle.abort_handle());
        match handle.await {
            Ok(()) => return,
            Err(e) if e.is_panic() => {
                let backoff = job.restart_backoff();
                error!(
                    job = %name,
                    backoff_ms = backoff.as_millis() as u64,
                    "Job panicked, restarting after backoff"
                );
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    _ = tokio::time::sleep(backoff) => {}
                }
            }
            Err(e) => {
                warn!(job = %name, error = %e, "Job task cancelled");
                return;
            }
        }
    }
}

fn spawn_job<J: SpawnableJob>(
    job: J,
    shutdown: &CancellationToken,
    running: &mut Vec<(String, JoinHandle<()>)>,
) {
    let job = Arc::new(job.with_cancellation(shutdown.clone()));
    let name = job.name();
    let handle = tokio::spawn(supervise(job, shutdown.clone()));
    running.push((name, handle));
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinReport {
    pub finished: usize,
    /// Jobs still running when the grace period ran out.
    pub aborted: usize,
}

/// Handles of every supervised job.
pub struct RunningJobs {
    jobs: Vec<(String, JoinHandle<()>)>,
}

impl RunningJobs {
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.jobs.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Waits for every job to return, aborting whatever is left after `grace`.
    /// Call after the shutdown token has been cancelled.
    pub async fn join(self, grace: Duration) -> JoinReport {
        let total = self.jobs.len();
        let (names, handles): (Vec<String>, Vec<JoinHandle<()>>) = self.jobs.into_iter().unzip();
        let aborters: Vec<_> = handles.iter().map(|h| h.abort_handle()).collect();

        match tokio::time::timeout(grace, join_all(handles)).await {
            Ok(_) => {
                info!(jobs = total, "All background jobs stopped");
                JoinReport {
                    finished: total,
                    aborted: 0,
                }
            }
            Err(_) => {
                let mut aborted = 0;
                for (name, aborter) in names.iter().zip(&aborters) {
                    if !aborter.is_finished() {
                        warn!(job = %name, "Job did not stop within grace period, aborting");
                        aborter.abort();
                        aborted += 1;
                    }
                }
                JoinReport {
                    finished: total - aborted,
                    aborted,
                }
            }
        }
    }
}

pub struct JobRunner {
    probes: Vec<ProbeJob>,
    cache_stats: Option<CacheStatsJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            probes: Vec::new(),
            cache_stats: None,
            shutdown: None,
        }
    }

    pub fn with_probe(mut self, job: ProbeJob) -> Self {
        self.probes.push(job);
        self
    }

    pub fn with_probes(mut self, jobs: impl IntoIterator<Item = ProbeJob>) -> Self {
        self.probes.extend(jobs);
        self
    }

    pub fn with_cache_stats(mut self, job: CacheStatsJob) -> Self {
        self.cache_stats = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub fn start(self) -> RunningJobs {
        info!("Starting background job runner");

        let shutdown = self.shutdown.unwrap_or_default();
        let mut running = Vec::with_capacity(self.probes.len() + 1);

        for probe in self.probes {
            spawn_job(probe, &shutdown, &mut running);
        }
        if let Some(job) = self.cache_stats {
            spawn_job(job, &shutdown, &mut running);
        }

        info!(jobs = running.len(), "All background jobs started");
        RunningJobs { jobs: running }
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}

pub mod cache_stats;
pub mod probe;
pub mod runner;

pub use cache_stats::{CacheStatsJob, PollerState};
pub use probe::ProbeJob;
pub use runner::{JobRunner, JoinReport, RunningJobs};

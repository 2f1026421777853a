pub mod cache_stats;
pub mod probes;

pub use cache_stats::{ScrapeCacheStatsUseCase, ScrapeReport};
pub use probes::{GetProbeHealthUseCase, ProbeHealth, ProbeHealthReport, RunProbeUseCase};

pub mod scrape_cache_stats;

pub use scrape_cache_stats::{parse_stat_value, ScrapeCacheStatsUseCase, ScrapeReport};

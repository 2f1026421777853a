use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use super::errors::ConfigError;
use crate::CacheStat;

/// Cache-statistics poller settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_server")]
    pub server: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    #[serde(default = "CacheStat::defaults")]
    pub stats: Vec<CacheStat>,
}

impl CacheConfig {
    pub fn server_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .parse()
            .map_err(|e| ConfigError::invalid_field("cache.server", format!("'{}': {}", self.server, e)))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            server: default_server(),
            poll_interval_ms: default_poll_interval_ms(),
            query_timeout_ms: default_query_timeout_ms(),
            stats: CacheStat::defaults(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_server() -> String {
    "127.0.0.1:53".to_string()
}

fn default_poll_interval_ms() -> u64 {
    5000
}

fn default_query_timeout_ms() -> u64 {
    1000
}

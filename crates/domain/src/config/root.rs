use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::logging::{LogFormat, LoggingConfig};
use super::probes::ProbesConfig;
use super::server::ServerConfig;
use crate::{CacheStat, ProbeSpec};

const LOCAL_CONFIG_PATH: &str = "dns-sidecar.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/dns-sidecar/config.toml";

/// Reserved by the scrape endpoint; the metrics path may not shadow them.
const RESERVED_PATHS: &[&str] = &["/healthz", "/healthcheck"];

/// Main configuration structure for the DNS sidecar
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Scrape endpoint configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Cache-statistics poller configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Synthetic DNS probes
    #[serde(default)]
    pub probes: ProbesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dns-sidecar.toml in current directory
    /// 3. /etc/dns-sidecar/config.toml
    /// 4. Default configuration
    ///
    /// Command-line overrides are applied on top and the result is validated.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) -> Result<(), ConfigError> {
        if let Some(addr) = overrides.listen_addr {
            self.server.listen_addr = addr;
        }
        if let Some(path) = overrides.metrics_path {
            self.server.metrics_path = path;
        }
        if let Some(server) = overrides.cache_server {
            self.cache.server = server;
        }
        if let Some(interval) = overrides.cache_poll_interval_ms {
            self.cache.poll_interval_ms = interval;
        }
        if overrides.disable_cache_stats {
            self.cache.enabled = false;
        }
        if overrides.disable_probe_jitter {
            self.probes.start_jitter = false;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }

        for (index, raw) in overrides.probes.iter().enumerate() {
            let spec: ProbeSpec = raw
                .parse()
                .map_err(|e| ConfigError::invalid_field(format!("--probe[{}]", index), e))?;
            self.probes.specs.push(spec);
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.listen_socket_addr()?;

        let path = &self.server.metrics_path;
        if !path.starts_with('/') || path.len() < 2 {
            return Err(ConfigError::invalid_field(
                "server.metrics_path",
                format!("'{}' must start with '/' and name a path", path),
            ));
        }
        if RESERVED_PATHS.iter().any(|reserved| path.starts_with(reserved)) {
            return Err(ConfigError::invalid_field(
                "server.metrics_path",
                format!("'{}' collides with a health endpoint", path),
            ));
        }

        if self.cache.enabled {
            self.cache.server_addr()?;
            if self.cache.poll_interval_ms == 0 {
                return Err(ConfigError::invalid_field(
                    "cache.poll_interval_ms",
                    "must be positive",
                ));
            }
            if self.cache.query_timeout_ms == 0 {
                return Err(ConfigError::invalid_field(
                    "cache.query_timeout_ms",
                    "must be positive",
                ));
            }
            let mut names = HashSet::new();
            for stat in &self.cache.stats {
                if !names.insert(stat.name()) {
                    return Err(ConfigError::invalid_field(
                        "cache.stats",
                        format!("statistic '{}' listed twice", stat.name()),
                    ));
                }
            }
        }

        let mut probe_names = HashSet::new();
        for spec in &self.probes.specs {
            if !probe_names.insert(spec.name.as_str()) {
                return Err(ConfigError::invalid_field(
                    "probes.specs",
                    format!("duplicate probe name '{}'", spec.name),
                ));
            }
        }

        if !self.cache.enabled && self.probes.specs.is_empty() {
            return Err(ConfigError::Validation(
                "nothing to do: no probes configured and cache statistics disabled".to_string(),
            ));
        }

        Ok(())
    }

    /// Statistics the poller will publish, empty when it is disabled.
    pub fn active_cache_stats(&self) -> &[CacheStat] {
        if self.cache.enabled {
            &self.cache.stats
        } else {
            &[]
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub listen_addr: Option<String>,
    pub metrics_path: Option<String>,
    pub cache_server: Option<String>,
    pub cache_poll_interval_ms: Option<u64>,
    pub disable_cache_stats: bool,
    pub disable_probe_jitter: bool,
    /// Raw `--probe` values, appended to the probes from the file.
    pub probes: Vec<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

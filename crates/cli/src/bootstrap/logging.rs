use dns_sidecar_domain::{ConfigError, LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Maps a numeric glog-style verbosity onto a filter; anything else is
/// taken as a directive.
pub fn verbosity_filter(level: &str) -> String {
    match level.trim().parse::<u8>() {
        Ok(0 | 1) => "info".to_string(),
        Ok(2 | 3) => "debug".to_string(),
        Ok(_) => "trace".to_string(),
        Err(_) => level.to_string(),
    }
}

/// Rejects a configured level `tracing` cannot parse, before anything starts.
pub fn validate_log_level(config: &LoggingConfig) -> Result<(), ConfigError> {
    EnvFilter::try_new(&config.level)
        .map(|_| ())
        .map_err(|e| ConfigError::invalid_field("logging.level", format!("'{}': {}", config.level, e)))
}

/// `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| anyhow::anyhow!("invalid log filter '{}': {}", config.level, e))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))
}

/// Used when the configuration itself could not be loaded.
pub fn init_fallback_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info"))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

use clap::Parser;
use dns_sidecar_domain::{CliOverrides, LogFormat};

use crate::bootstrap::verbosity_filter;

#[derive(Debug, Parser)]
#[command(name = "dns-sidecar")]
#[command(version)]
#[command(about = "Synthetic DNS probes and cache statistics for a local DNS cache")]
pub struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<String>,

    /// Address for the scrape endpoint (HOST:PORT or :PORT)
    #[arg(long, value_name = "HOST:PORT")]
    pub listen_addr: Option<String>,

    /// Path the metrics are served on
    #[arg(long, value_name = "PATH")]
    pub metrics_path: Option<String>,

    /// Where cache statistics are queried
    #[arg(long, value_name = "HOST:PORT")]
    pub cache_server: Option<String>,

    /// Cache statistics poll interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub cache_poll_interval_ms: Option<u64>,

    /// Do not poll cache statistics
    #[arg(long)]
    pub no_cache_stats: bool,

    /// Probe as NAME,SERVER,QUERY_NAME,INTERVAL_SECONDS[,TYPE][,key=value]... (repeatable)
    #[arg(long = "probe", value_name = "SPEC")]
    pub probes: Vec<String>,

    /// Verbosity: 0-5 or a tracing filter directive
    #[arg(short = 'v', value_name = "LEVEL")]
    pub verbosity: Option<String>,

    /// Log output format
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub log_format: Option<LogFormatArg>,

    /// Start every probe immediately instead of at a random offset
    #[arg(long)]
    pub no_probe_jitter: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            listen_addr: self.listen_addr.clone(),
            metrics_path: self.metrics_path.clone(),
            cache_server: self.cache_server.clone(),
            cache_poll_interval_ms: self.cache_poll_interval_ms,
            disable_cache_stats: self.no_cache_stats,
            disable_probe_jitter: self.no_probe_jitter,
            probes: self.probes.clone(),
            log_level: self.verbosity.as_deref().map(verbosity_filter),
            log_format: self.log_format.map(LogFormat::from),
        }
    }
}

//! DNS sidecar domain layer
pub mod cache_stat;
pub mod config;
pub mod errors;
pub mod probe_result;
pub mod probe_spec;
pub mod record_type;
pub mod transport;

pub use cache_stat::CacheStat;
pub use config::{CliOverrides, Config, ConfigError, LogFormat, LoggingConfig};
pub use errors::DomainError;
pub use probe_result::{ExpectedOutcome, ProbeResult};
pub use probe_spec::ProbeSpec;
pub use record_type::RecordType;
pub use transport::TransportMode;

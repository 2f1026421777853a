pub mod cache;
pub mod errors;
pub mod logging;
pub mod probes;
pub mod root;
pub mod server;

pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use probes::ProbesConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;

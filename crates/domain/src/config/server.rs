use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use super::errors::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// `HOST:PORT` for the scrape endpoint. A bare `:PORT` binds all interfaces.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,

    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl ServerConfig {
    pub fn listen_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = if self.listen_addr.starts_with(':') {
            format!("0.0.0.0{}", self.listen_addr)
        } else {
            self.listen_addr.clone()
        };
        addr.parse()
            .map_err(|e| ConfigError::invalid_field("server.listen_addr", format!("'{}': {}", self.listen_addr, e)))
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            metrics_path: default_metrics_path(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

fn default_listen_addr() -> String {
    ":10054".to_string()
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_shutdown_grace_secs() -> u64 {
    5
}

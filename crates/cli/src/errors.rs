use dns_sidecar_domain::ConfigError;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SidecarError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind scrape endpoint on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Fatal(#[from] anyhow::Error),
}

impl SidecarError {
    /// Process exit status: 2 for configuration errors, 1 for anything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            SidecarError::Config(_) => 2,
            SidecarError::Bind { .. } | SidecarError::Fatal(_) => 1,
        }
    }
}

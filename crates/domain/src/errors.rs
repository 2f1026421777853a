use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid server address: {0}")]
    InvalidServerAddress(String),

    #[error("Invalid probe spec '{spec}': {reason}")]
    InvalidProbeSpec { spec: String, reason: String },

    #[error("Invalid cache statistic: {0}")]
    InvalidCacheStat(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Transport error talking to {server}: {reason}")]
    Transport { server: String, reason: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("DNS response ID mismatch from {server}: expected {expected:#06x}, got {actual:#06x}")]
    ResponseIdMismatch {
        server: String,
        expected: u16,
        actual: u16,
    },

    #[error("DNS response question does not match query for {0}")]
    QuestionMismatch(String),

    #[error("Unexpected TXT answer: {0}")]
    UnexpectedTxtAnswer(String),

    #[error("Server answered with {0}")]
    ServerError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    pub fn transport(server: impl ToString, reason: impl ToString) -> Self {
        Self::Transport {
            server: server.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_spec(spec: &str, reason: impl Into<String>) -> Self {
        Self::InvalidProbeSpec {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::QueryTimeout)
    }
}

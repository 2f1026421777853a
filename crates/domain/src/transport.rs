use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// How a probe reaches its server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransportMode {
    /// UDP, retried over TCP when the answer comes back truncated.
    #[default]
    Auto,
    Udp,
    Tcp,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Auto => "auto",
            TransportMode::Udp => "udp",
            TransportMode::Tcp => "tcp",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(TransportMode::Auto),
            "udp" => Ok(TransportMode::Udp),
            "tcp" => Ok(TransportMode::Tcp),
            other => Err(DomainError::ConfigError(format!(
                "transport must be one of auto, udp, tcp; got '{}'",
                other
            ))),
        }
    }
}

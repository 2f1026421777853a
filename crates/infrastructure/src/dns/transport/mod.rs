pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use dns_sidecar_domain::{DomainError, TransportMode};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Sends one message and waits for one reply. Sockets live for the
    /// duration of the call only.
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

/// First-attempt transport for a mode; `Auto` starts on UDP.
pub fn initial_transport(mode: TransportMode, server: SocketAddr) -> Box<dyn DnsTransport> {
    match mode {
        TransportMode::Auto | TransportMode::Udp => Box::new(udp::UdpTransport::new(server)),
        TransportMode::Tcp => Box::new(tcp::TcpTransport::new(server)),
    }
}

pub fn validate_response_id(
    query: &[u8],
    response: &[u8],
    server: SocketAddr,
) -> Result<(), DomainError> {
    if query.len() < 2 || response.len() < 2 {
        return Err(DomainError::InvalidDnsResponse(format!(
            "message from {} too short to carry an ID",
            server
        )));
    }

    let expected = u16::from_be_bytes([query[0], query[1]]);
    let actual = u16::from_be_bytes([response[0], response[1]]);
    if expected != actual {
        return Err(DomainError::ResponseIdMismatch {
            server: server.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

pub(crate) fn map_io_error(server: SocketAddr, error: io::Error) -> DomainError {
    match error.kind() {
        io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused {
            server: server.to_string(),
        },
        io::ErrorKind::TimedOut => DomainError::QueryTimeout,
        _ => DomainError::transport(server, error),
    }
}

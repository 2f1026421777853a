//! TCP transport (RFC 1035 §4.2.2): two-byte length prefix, one connection per call.

use super::{map_io_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use dns_sidecar_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;

pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn exchange(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        let server = self.server_addr;

        let mut stream = TcpStream::connect(server)
            .await
            .map_err(|e| map_io_error(server, e))?;
        stream
            .set_nodelay(true)
            .map_err(|e| map_io_error(server, e))?;

        send_with_length_prefix(&mut stream, message_bytes, server).await?;
        debug!(server = %server, message_len = message_bytes.len(), "TCP query sent");

        let response = read_with_length_prefix(&mut stream, server).await?;
        debug!(server = %server, response_len = response.len(), "TCP response received");

        Ok(response)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let bytes = tokio::time::timeout(timeout, self.exchange(message_bytes))
            .await
            .map_err(|_| DomainError::QueryTimeout)??;

        Ok(TransportResponse {
            bytes,
            protocol_used: "TCP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
    server: SocketAddr,
) -> Result<(), DomainError>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        DomainError::transport(server, format!("message of {} bytes too large", message_bytes.len()))
    })?;

    stream
        .write_all(&length.to_be_bytes())
        .await
        .map_err(|e| map_io_error(server, e))?;
    stream
        .write_all(message_bytes)
        .await
        .map_err(|e| map_io_error(server, e))?;
    stream.flush().await.map_err(|e| map_io_error(server, e))?;

    Ok(())
}

pub(crate) async fn read_with_length_prefix<S>(
    stream: &mut S,
    server: SocketAddr,
) -> Result<Vec<u8>, DomainError>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| map_io_error(server, e))?;

    let response_len = u16::from_be_bytes(len_buf) as usize;
    if response_len > MAX_TCP_MESSAGE_SIZE {
        return Err(DomainError::InvalidDnsResponse(format!(
            "response too large: {} bytes (max {})",
            response_len, MAX_TCP_MESSAGE_SIZE
        )));
    }

    let mut response = vec![0u8; response_len];
    stream
        .read_exact(&mut response)
        .await
        .map_err(|e| map_io_error(server, e))?;

    Ok(response)
}

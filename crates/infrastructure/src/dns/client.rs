//! One-shot DNS client used by probes and the cache-statistics poller.
//!
//! Every call builds a fresh query, opens its own socket and applies a single
//! overall deadline. In `auto` mode a truncated UDP answer is re-asked over
//! TCP within whatever time is left; that retry is part of the same call.

use super::forwarding::{DnsResponse, MessageBuilder, ResponseParser};
use super::transport::{initial_transport, tcp::TcpTransport, validate_response_id, DnsTransport};
use async_trait::async_trait;
use dns_sidecar_application::ports::{DnsClientPort, QueryOutcome};
use dns_sidecar_domain::{DomainError, ProbeResult, ProbeSpec, TransportMode};
use hickory_proto::op::ResponseCode;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct HickoryDnsClient;

impl HickoryDnsClient {
    pub fn new() -> Self {
        Self
    }

    /// Sends `query`, validates ID and question, and parses the reply.
    pub async fn exchange(
        &self,
        server: SocketAddr,
        mode: TransportMode,
        query: &[u8],
        timeout: Duration,
    ) -> Result<DnsResponse, DomainError> {
        // Absurdly long intervals overflow the clock; the retry then gets the full timeout.
        let deadline = Instant::now().checked_add(timeout);

        let first = initial_transport(mode, server);
        let response = Self::send_and_parse(first.as_ref(), server, query, timeout).await?;

        if response.truncated && mode == TransportMode::Auto {
            let remaining = deadline
                .map_or(timeout, |deadline| deadline.saturating_duration_since(Instant::now()));
            if remaining.is_zero() {
                return Err(DomainError::QueryTimeout);
            }
            debug!(server = %server, "Truncated UDP response, retrying over TCP");
            let tcp = TcpTransport::new(server);
            return Self::send_and_parse(&tcp, server, query, remaining).await;
        }

        Ok(response)
    }

    async fn send_and_parse(
        transport: &dyn DnsTransport,
        server: SocketAddr,
        query: &[u8],
        timeout: Duration,
    ) -> Result<DnsResponse, DomainError> {
        let reply = transport.send(query, timeout).await?;
        validate_response_id(query, &reply.bytes, server)?;
        ResponseParser::validate_question(query, &reply.bytes)?;
        ResponseParser::parse(&reply.bytes)
    }

    pub fn classify(outcome: &Result<DnsResponse, DomainError>) -> ProbeResult {
        match outcome {
            Err(e) if e.is_timeout() => ProbeResult::Timeout,
            Err(_) => ProbeResult::Error,
            Ok(response) => match response.rcode {
                ResponseCode::NoError => ProbeResult::Ok,
                ResponseCode::NXDomain => ProbeResult::NxDomain,
                _ => ProbeResult::ServFail,
            },
        }
    }
}

#[async_trait]
impl DnsClientPort for HickoryDnsClient {
    async fn probe(&self, spec: &ProbeSpec) -> QueryOutcome {
        let started = Instant::now();

        let outcome = match MessageBuilder::build_query_with_id(&spec.query_name, &spec.query_type) {
            Ok(query) => tokio::time::timeout(
                spec.timeout,
                self.exchange(spec.server, spec.transport, &query.bytes, spec.timeout),
            )
            .await
            .unwrap_or(Err(DomainError::QueryTimeout)),
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            debug!(probe = %spec.name, server = %spec.server, error = %e, "Probe query failed");
        }

        QueryOutcome::new(Self::classify(&outcome), started.elapsed())
    }

    async fn chaos_txt(
        &self,
        server: SocketAddr,
        name: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, DomainError> {
        let query = MessageBuilder::build_chaos_txt_query(name)?;

        let response = tokio::time::timeout(
            timeout,
            self.exchange(server, TransportMode::Auto, &query.bytes, timeout),
        )
        .await
        .unwrap_or(Err(DomainError::QueryTimeout))?;

        if response.rcode != ResponseCode::NoError {
            return Err(DomainError::ServerError(
                ResponseParser::rcode_to_status(response.rcode).to_string(),
            ));
        }

        response.txt_strings()
    }
}

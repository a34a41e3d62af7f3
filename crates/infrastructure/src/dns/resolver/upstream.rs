use super::context::ResolutionContext;
use super::counters::ResolverCounters;
use crate::dns::codec::{decode_message, encode_message};
use crate::dns::transport::DnsTransport;
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use triedns_domain::{
    DnsMessage, DnsName, DnsProtocol, DomainError, RecordType, ResolverConfig, ResponseCode,
};

/// Why an attempt did not produce an acceptable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    Timeout,
    Transport,
    IdMismatch,
    NotAResponse,
    /// The server answered FORMERR; EDNS is dropped for the next try.
    FormatError,
    /// TC was set; the next try goes over TCP.
    Truncated,
    Malformed,
}

impl RetryReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetryReason::Timeout => "timeout",
            RetryReason::Transport => "transport",
            RetryReason::IdMismatch => "id_mismatch",
            RetryReason::NotAResponse => "not_a_response",
            RetryReason::FormatError => "format_error",
            RetryReason::Truncated => "truncated",
            RetryReason::Malformed => "malformed",
        }
    }

    /// Failures blamed on the server itself: move on to the next one.
    fn switches_server(&self) -> bool {
        matches!(
            self,
            RetryReason::Timeout | RetryReason::Transport | RetryReason::Malformed
        )
    }
}

#[derive(Debug)]
pub enum AttemptOutcome {
    Accepted(DnsMessage),
    Retry(RetryReason),
    Failed(DomainError),
}

/// Sends one question to a list of servers until a usable response comes
/// back or the attempt budget runs out.
///
/// Servers are tried in ascending order of their skip count, which grows on
/// every timeout or I/O failure and is reset by an accepted response.
pub struct UpstreamQuerier {
    transport: Arc<dyn DnsTransport>,
    counters: Arc<ResolverCounters>,
    skips: DashMap<SocketAddr, u32>,
    attempts: u32,
    attempt_timeout: Duration,
    edns_payload_size: u16,
}

impl UpstreamQuerier {
    pub fn new(
        transport: Arc<dyn DnsTransport>,
        counters: Arc<ResolverCounters>,
        config: &ResolverConfig,
    ) -> Self {
        Self {
            transport,
            counters,
            skips: DashMap::new(),
            attempts: config.attempts,
            attempt_timeout: Duration::from_millis(config.attempt_timeout_ms),
            edns_payload_size: config.edns_payload_size,
        }
    }

    pub fn counters(&self) -> &Arc<ResolverCounters> {
        &self.counters
    }

    pub fn skip_count(&self, server: &SocketAddr) -> u32 {
        self.skips.get(server).map(|s| *s).unwrap_or(0)
    }

    /// Stable sort, so equally-skipped servers keep their configured order.
    pub fn order_servers(&self, servers: &[SocketAddr]) -> Vec<SocketAddr> {
        let mut ordered = servers.to_vec();
        ordered.sort_by_key(|server| self.skip_count(server));
        ordered
    }

    fn edns_enabled(&self) -> bool {
        self.edns_payload_size > 0
    }

    pub async fn query(
        &self,
        ctx: &mut ResolutionContext,
        servers: &[SocketAddr],
        name: &DnsName,
        record_type: RecordType,
        recursion_desired: bool,
    ) -> Result<(DnsMessage, SocketAddr), DomainError> {
        ctx.ensure_budget()?;
        let order = self.order_servers(servers);
        if order.is_empty() {
            return Err(DomainError::ResolutionFailed { attempts: 0 });
        }

        let mut index = 0;
        let mut protocol = DnsProtocol::Udp;
        let mut edns = self.edns_enabled();

        for attempt in 1..=self.attempts {
            let server = order[index % order.len()];

            let outcome = self
                .attempt(ctx, server, protocol, edns, name, record_type, recursion_desired)
                .await;

            match outcome {
                AttemptOutcome::Accepted(response) => {
                    self.skips.remove(&server);
                    debug!(
                        server = %server,
                        protocol = %protocol,
                        attempt,
                        rcode = response.flags.rcode.as_str(),
                        "Upstream response accepted"
                    );
                    return Ok((response, server));
                }
                AttemptOutcome::Failed(e) => return Err(e),
                AttemptOutcome::Retry(reason) => {
                    debug!(
                        server = %server,
                        protocol = %protocol,
                        attempt,
                        reason = reason.as_str(),
                        "Upstream attempt will be retried"
                    );
                    match reason {
                        RetryReason::FormatError => edns = false,
                        RetryReason::Truncated => protocol = DnsProtocol::Tcp,
                        _ if reason.switches_server() => {
                            *self.skips.entry(server).or_insert(0) += 1;
                            index += 1;
                            protocol = DnsProtocol::Udp;
                            edns = self.edns_enabled();
                        }
                        _ => {}
                    }
                }
            }
        }

        warn!(
            domain = %name,
            record_type = %record_type,
            attempts = self.attempts,
            "Upstream attempts exhausted"
        );
        Err(DomainError::ResolutionFailed {
            attempts: self.attempts,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn attempt(
        &self,
        ctx: &mut ResolutionContext,
        server: SocketAddr,
        protocol: DnsProtocol,
        edns: bool,
        name: &DnsName,
        record_type: RecordType,
        recursion_desired: bool,
    ) -> AttemptOutcome {
        if let Err(e) = ctx.charge_query() {
            return AttemptOutcome::Failed(e);
        }
        self.counters.record_query();

        let id = fastrand::u16(..);
        let mut query = DnsMessage::query(id, name.clone(), record_type, recursion_desired);
        if edns {
            query.set_edns(self.edns_payload_size);
        }
        let bytes = match encode_message(&query, protocol.base_payload_limit()) {
            Ok(bytes) => bytes,
            Err(e) => return AttemptOutcome::Failed(e.into()),
        };

        match self
            .transport
            .exchange(server, protocol, &bytes, self.attempt_timeout)
            .await
        {
            Ok(reply) => self.evaluate(id, &reply),
            Err(DomainError::QueryTimeout) => {
                self.counters.record_timeout();
                AttemptOutcome::Retry(RetryReason::Timeout)
            }
            Err(e) => {
                self.counters.record_timeout();
                debug!(server = %server, error = %e, "Upstream exchange failed");
                AttemptOutcome::Retry(RetryReason::Transport)
            }
        }
    }

    /// Classifies a raw reply to the query carrying `expected_id`.
    pub fn evaluate(&self, expected_id: u16, reply: &[u8]) -> AttemptOutcome {
        let response = match decode_message(reply) {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "Undecodable upstream response");
                return AttemptOutcome::Retry(RetryReason::Malformed);
            }
        };

        if response.id != expected_id {
            return AttemptOutcome::Retry(RetryReason::IdMismatch);
        }
        if !response.flags.response {
            return AttemptOutcome::Retry(RetryReason::NotAResponse);
        }
        if response.flags.rcode == ResponseCode::FormErr {
            self.counters.record_format_error();
            return AttemptOutcome::Retry(RetryReason::FormatError);
        }
        if response.flags.truncated {
            return AttemptOutcome::Retry(RetryReason::Truncated);
        }
        AttemptOutcome::Accepted(response)
    }
}

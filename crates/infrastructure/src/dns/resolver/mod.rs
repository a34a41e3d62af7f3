pub mod context;
pub mod counters;
pub mod forwarder;
pub mod iterative;
pub mod upstream;

pub use context::ResolutionContext;
pub use counters::ResolverCounters;
pub use forwarder::ForwardingResolver;
pub use iterative::IterativeResolver;
pub use upstream::{AttemptOutcome, RetryReason, UpstreamQuerier};

use crate::dns::codec::rdata_to_text;
use std::net::SocketAddr;
use tracing::warn;
use triedns_application::ports::DnsResolution;
use triedns_domain::{parse_server_address, DnsMessage, DomainError, RecordType, ResponseCode};

/// Turns an accepted upstream response into the first usable answer.
pub(crate) fn answer_from_response(
    response: &DnsMessage,
    record_type: RecordType,
    server: Option<SocketAddr>,
) -> Result<DnsResolution, DomainError> {
    match response.flags.rcode {
        ResponseCode::NoError => {}
        ResponseCode::NxDomain => return Err(DomainError::NxDomain),
        other => {
            return Err(DomainError::Transport {
                server: server.map(|s| s.to_string()).unwrap_or_default(),
                reason: format!("upstream answered {}", other.as_str()),
            })
        }
    }

    let record = response
        .answers_of(record_type)
        .next()
        .ok_or(DomainError::NoAnswer)?;
    let value = rdata_to_text(record.record_type, &record.rdata)?;

    let resolution = DnsResolution::new(record.record_type, value, Some(record.ttl));
    Ok(match server {
        Some(server) => resolution.with_server(server.to_string()),
        None => resolution,
    })
}

/// Parses configured server entries (a bare IP means port 53), skipping and
/// logging bad ones. `Config::validate` rejects those before startup.
pub(crate) fn parse_server_list(entries: &[String], what: &str) -> Vec<SocketAddr> {
    entries
        .iter()
        .filter_map(|entry| match parse_server_address(entry) {
            Ok(addr) => Some(addr),
            Err(e) => {
                warn!(entry = %entry, kind = what, error = %e, "Ignoring invalid server address");
                None
            }
        })
        .collect()
}

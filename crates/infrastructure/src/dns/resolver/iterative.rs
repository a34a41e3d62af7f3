use super::context::ResolutionContext;
use super::upstream::UpstreamQuerier;
use super::{answer_from_response, parse_server_list};
use crate::dns::codec::decode_name;
use async_trait::async_trait;
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use triedns_application::ports::{DnsResolution, DnsResolver};
use triedns_domain::{
    DnsMessage, DnsName, DnsQuery, DomainError, RecordType, ResolverConfig, ResponseCode,
};

/// Nested resolutions allowed for nameservers that came without glue.
pub const MAX_GLUE_DEPTH: usize = 4;

const NAMESERVER_PORT: u16 = 53;

type ResolveFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(DnsMessage, SocketAddr), DomainError>> + Send + 'a>>;

/// Walks the delegation chain from the root hints with RD clear.
pub struct IterativeResolver {
    querier: Arc<UpstreamQuerier>,
    root_hints: Vec<SocketAddr>,
    query_ceiling: u32,
    step_timeout: Duration,
}

impl IterativeResolver {
    pub fn new(querier: Arc<UpstreamQuerier>, config: &ResolverConfig) -> Self {
        let root_hints = parse_server_list(&config.root_hints, "root_hint");
        info!(root_hints = root_hints.len(), "Iterative resolver created");

        Self {
            querier,
            root_hints,
            query_ceiling: config.query_ceiling,
            step_timeout: Duration::from_secs(config.forward_timeout_secs),
        }
    }

    fn resolve_from_roots<'a>(
        &'a self,
        ctx: &'a mut ResolutionContext,
        name: &'a DnsName,
        record_type: RecordType,
        depth: usize,
    ) -> ResolveFuture<'a> {
        Box::pin(async move {
            let mut servers = self.root_hints.clone();

            loop {
                let (response, server) = self
                    .querier
                    .query(ctx, &servers, name, record_type, false)
                    .await?;

                if !response.answers.is_empty() || response.flags.rcode != ResponseCode::NoError {
                    return Ok((response, server));
                }

                let nameservers = referral_nameservers(&response);
                if nameservers.is_empty() {
                    return Ok((response, server));
                }

                let mut next = glue_addresses(&response, &nameservers);
                if next.is_empty() {
                    next = self
                        .resolve_glueless(ctx, &nameservers, depth)
                        .await?;
                }
                if next.is_empty() {
                    warn!(domain = %name, "Referral led to nameservers without addresses");
                    return Err(DomainError::ResolutionFailed {
                        attempts: ctx.queries_sent(),
                    });
                }

                debug!(
                    domain = %name,
                    from = %server,
                    nameservers = nameservers.len(),
                    next_servers = next.len(),
                    "Following referral"
                );
                servers = next;
            }
        })
    }

    async fn resolve_glueless(
        &self,
        ctx: &mut ResolutionContext,
        nameservers: &[DnsName],
        depth: usize,
    ) -> Result<Vec<SocketAddr>, DomainError> {
        if depth >= MAX_GLUE_DEPTH {
            warn!(depth, "Glue-less nameserver chain too deep");
            return Ok(Vec::new());
        }

        for ns in nameservers {
            match self
                .resolve_from_roots(ctx, ns, RecordType::A, depth + 1)
                .await
            {
                Ok((response, _)) => {
                    let addresses = address_records(&response, ns);
                    if !addresses.is_empty() {
                        return Ok(addresses);
                    }
                }
                Err(e @ DomainError::TooManyQueries { .. }) => return Err(e),
                Err(e) => debug!(nameserver = %ns, error = %e, "Nameserver address lookup failed"),
            }
        }
        Ok(Vec::new())
    }
}

fn referral_nameservers(response: &DnsMessage) -> Vec<DnsName> {
    response
        .authorities
        .iter()
        .filter(|rr| rr.record_type == RecordType::NS)
        .filter_map(|rr| decode_name(&rr.rdata, 0).ok().map(|(name, _)| name))
        .collect()
}

fn a_record_address(rdata: &[u8]) -> Option<SocketAddr> {
    let octets: [u8; 4] = rdata.try_into().ok()?;
    Some(SocketAddr::new(
        IpAddr::V4(Ipv4Addr::from(octets)),
        NAMESERVER_PORT,
    ))
}

/// Addresses for the referred nameservers carried in the additional section.
fn glue_addresses(response: &DnsMessage, nameservers: &[DnsName]) -> Vec<SocketAddr> {
    response
        .additionals
        .iter()
        .filter(|rr| rr.record_type == RecordType::A && nameservers.contains(&rr.name))
        .filter_map(|rr| a_record_address(&rr.rdata))
        .collect()
}

fn address_records(response: &DnsMessage, name: &DnsName) -> Vec<SocketAddr> {
    response
        .answers
        .iter()
        .filter(|rr| rr.record_type == RecordType::A && rr.name == *name)
        .filter_map(|rr| a_record_address(&rr.rdata))
        .collect()
}

#[async_trait]
impl DnsResolver for IterativeResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError> {
        debug!(
            domain = %query.domain,
            record_type = %query.record_type,
            "Resolving iteratively from root hints"
        );

        let mut ctx = ResolutionContext::new(self.query_ceiling);
        let walk = self.resolve_from_roots(&mut ctx, &query.domain, query.record_type, 0);

        let (response, server) = tokio::time::timeout(self.step_timeout, walk)
            .await
            .map_err(|_| DomainError::QueryTimeout)??;

        answer_from_response(&response, query.record_type, Some(server))
    }
}

use super::context::ResolutionContext;
use super::upstream::UpstreamQuerier;
use super::{answer_from_response, parse_server_list};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use triedns_application::ports::{DnsResolution, DnsResolver};
use triedns_domain::{DnsQuery, DomainError, ResolverConfig};

/// Relays queries, RD set, to the configured upstream resolvers.
pub struct ForwardingResolver {
    querier: Arc<UpstreamQuerier>,
    servers: Vec<SocketAddr>,
    query_ceiling: u32,
    step_timeout: Duration,
}

impl ForwardingResolver {
    pub fn new(querier: Arc<UpstreamQuerier>, config: &ResolverConfig) -> Self {
        let servers = parse_server_list(&config.upstream_servers, "upstream");
        info!(
            servers = servers.len(),
            timeout_secs = config.forward_timeout_secs,
            "Forwarding resolver created"
        );

        Self {
            querier,
            servers,
            query_ceiling: config.query_ceiling,
            step_timeout: Duration::from_secs(config.forward_timeout_secs),
        }
    }

    pub fn servers(&self) -> &[SocketAddr] {
        &self.servers
    }
}

#[async_trait]
impl DnsResolver for ForwardingResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError> {
        debug!(
            domain = %query.domain,
            record_type = %query.record_type,
            "Forwarding query upstream"
        );

        let mut ctx = ResolutionContext::new(self.query_ceiling);
        let step = self.querier.query(
            &mut ctx,
            &self.servers,
            &query.domain,
            query.record_type,
            true,
        );

        let (response, server) = tokio::time::timeout(self.step_timeout, step)
            .await
            .map_err(|_| DomainError::QueryTimeout)??;

        answer_from_response(&response, query.record_type, Some(server))
    }
}

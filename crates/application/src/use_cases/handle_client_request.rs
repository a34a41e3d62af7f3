use super::resolve_name::ResolveNameUseCase;
use crate::ports::ZoneLookup;
use std::sync::Arc;
use tracing::{debug, warn};
use triedns_domain::{ClientRequest, DnsQuery, RecordType, NOT_FOUND_REPLY};

/// Serves one request of the text protocol: a bare domain name gets its
/// value (or `NOT FOUND`), `trie` gets the zone dump.
pub struct HandleClientRequestUseCase {
    resolve: Arc<ResolveNameUseCase>,
    zones: Arc<dyn ZoneLookup>,
}

impl HandleClientRequestUseCase {
    pub fn new(resolve: Arc<ResolveNameUseCase>, zones: Arc<dyn ZoneLookup>) -> Self {
        Self { resolve, zones }
    }

    pub async fn execute(&self, line: &str) -> String {
        let request = match ClientRequest::parse(line) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "Rejected client request");
                return NOT_FOUND_REPLY.to_string();
            }
        };

        match request {
            ClientRequest::DumpTrie => self.zones.render_tree(),
            ClientRequest::Lookup(domain) => {
                let query = DnsQuery::new(domain, RecordType::A);
                match self.resolve.execute(&query).await {
                    Ok(resolution) => resolution.value,
                    Err(e) if e.is_not_found() => NOT_FOUND_REPLY.to_string(),
                    Err(e) => {
                        warn!(domain = %query.domain, error = %e, "Resolution failed");
                        NOT_FOUND_REPLY.to_string()
                    }
                }
            }
        }
    }
}

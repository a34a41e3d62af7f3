use async_trait::async_trait;
use triedns_domain::{DnsQuery, DomainError, RecordType};

/// An answer obtained from outside the local zones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsResolution {
    pub record_type: RecordType,
    /// Presentation form of the first usable answer record.
    pub value: String,
    pub ttl: Option<u32>,
    pub upstream_server: Option<String>,
}

impl DnsResolution {
    pub fn new(record_type: RecordType, value: impl Into<String>, ttl: Option<u32>) -> Self {
        Self {
            record_type,
            value: value.into(),
            ttl,
            upstream_server: None,
        }
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.upstream_server = Some(server.into());
        self
    }
}

#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Resolve `query` upstream. `NxDomain` and `NoAnswer` mean the name has
    /// no answer; every other error means resolution itself broke.
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError>;
}

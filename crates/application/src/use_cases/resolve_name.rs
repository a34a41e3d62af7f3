use crate::ports::{DnsResolver, ResponseCachePort, ZoneLookup};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use triedns_domain::{DnsQuery, DomainError, RecordType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Cache,
    Zone,
    Upstream,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Cache => "cache",
            AnswerSource::Zone => "zone",
            AnswerSource::Upstream => "upstream",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub record_type: RecordType,
    pub value: String,
    pub ttl: u32,
    pub source: AnswerSource,
}

/// Answers a query from the cache, then the local zones, then upstream.
/// Zone and upstream answers are cached under the name as queried.
pub struct ResolveNameUseCase {
    cache: Arc<dyn ResponseCachePort>,
    zones: Arc<dyn ZoneLookup>,
    upstream: Arc<dyn DnsResolver>,
}

impl ResolveNameUseCase {
    pub fn new(
        cache: Arc<dyn ResponseCachePort>,
        zones: Arc<dyn ZoneLookup>,
        upstream: Arc<dyn DnsResolver>,
    ) -> Self {
        Self {
            cache,
            zones,
            upstream,
        }
    }

    pub async fn execute(&self, query: &DnsQuery) -> Result<Resolution, DomainError> {
        let start = Instant::now();
        let key = query.cache_key();

        if let Some(cached) = self.cache.lookup(&key) {
            if cached.record_type == query.record_type {
                debug!(domain = %key, record_type = %cached.record_type, "Cache hit");
                return Ok(Resolution {
                    record_type: cached.record_type,
                    value: cached.value,
                    ttl: cached.ttl,
                    source: AnswerSource::Cache,
                });
            }
        }

        if let Some(answer) = self.zones.lookup(&query.domain, query.record_type) {
            let record = answer.record;
            self.cache
                .insert(&key, record.record_type, &record.value, Some(record.ttl));
            debug!(
                domain = %key,
                owner = %answer.owner,
                delegations = answer.delegations.len(),
                elapsed_us = start.elapsed().as_micros() as u64,
                "Answered from zone"
            );
            return Ok(Resolution {
                record_type: record.record_type,
                value: record.value,
                ttl: record.ttl,
                source: AnswerSource::Zone,
            });
        }

        let resolution = self.upstream.resolve(query).await?;
        let ttl = resolution.ttl.unwrap_or_else(|| self.cache.default_ttl());
        self.cache
            .insert(&key, resolution.record_type, &resolution.value, Some(ttl));

        debug!(
            domain = %key,
            server = resolution.upstream_server.as_deref().unwrap_or("-"),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Answered from upstream"
        );

        Ok(Resolution {
            record_type: resolution.record_type,
            value: resolution.value,
            ttl,
            source: AnswerSource::Upstream,
        })
    }
}

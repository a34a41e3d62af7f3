#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use triedns_application::ports::{
    CacheMetricsSnapshot, CachedAnswer, DnsResolution, DnsResolver, ResponseCachePort,
    ZoneLookup,
};
use triedns_domain::{DnsName, DnsQuery, DomainError, RecordType, ZoneAnswer, ZoneRecord};

// ── cache ────────────────────────────────────────────────────────────────────

pub struct MockResponseCache {
    entries: RwLock<HashMap<String, CachedAnswer>>,
    default_ttl: u32,
}

impl MockResponseCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl: 50,
        }
    }

    pub fn get(&self, key: &str) -> Option<CachedAnswer> {
        self.entries.read().unwrap().get(key).cloned()
    }
}

impl Default for MockResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCachePort for MockResponseCache {
    fn lookup(&self, key: &str) -> Option<CachedAnswer> {
        self.get(key)
    }

    fn insert(&self, key: &str, record_type: RecordType, value: &str, ttl: Option<u32>) {
        self.entries.write().unwrap().insert(
            key.to_string(),
            CachedAnswer {
                record_type,
                value: value.to_string(),
                ttl: ttl.unwrap_or(self.default_ttl),
            },
        );
    }

    fn default_ttl(&self) -> u32 {
        self.default_ttl
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            total_entries: self.len(),
            ..CacheMetricsSnapshot::default()
        }
    }
}

// ── zones ────────────────────────────────────────────────────────────────────

/// Zone view backed by a map that counts every lookup.
pub struct CountingZoneLookup {
    answers: RwLock<HashMap<DnsName, ZoneRecord>>,
    lookups: AtomicUsize,
}

impl CountingZoneLookup {
    pub fn new() -> Self {
        Self {
            answers: RwLock::new(HashMap::new()),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn with_record(self, name: &str, record: ZoneRecord) -> Self {
        self.answers
            .write()
            .unwrap()
            .insert(name.parse().unwrap(), record);
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl Default for CountingZoneLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneLookup for CountingZoneLookup {
    fn lookup(&self, name: &DnsName, _record_type: RecordType) -> Option<ZoneAnswer> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.answers
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .map(|record| ZoneAnswer {
                owner: name.clone(),
                record,
                delegations: Vec::new(),
            })
    }

    fn render_tree(&self) -> String {
        let answers = self.answers.read().unwrap();
        let mut names: Vec<String> = answers.keys().map(|n| n.to_string()).collect();
        names.sort();
        names.join("\n")
    }

    fn zone_count(&self) -> usize {
        self.answers.read().unwrap().len()
    }
}

// ── upstream ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockDnsResolver {
    responses: Arc<RwLock<HashMap<String, DnsResolution>>>,
    errors: Arc<RwLock<HashMap<String, DomainError>>>,
    calls: Arc<AtomicUsize>,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            errors: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_response(&self, domain: &str, resolution: DnsResolution) {
        self.responses
            .write()
            .unwrap()
            .insert(domain.to_string(), resolution);
    }

    pub fn set_error(&self, domain: &str, error: DomainError) {
        self.errors
            .write()
            .unwrap()
            .insert(domain.to_string(), error);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockDnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = query.domain.to_string();

        if let Some(error) = self.errors.read().unwrap().get(&key) {
            return Err(error.clone());
        }

        self.responses
            .read()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or(DomainError::NxDomain)
    }
}

use triedns_domain::RecordType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAnswer {
    pub record_type: RecordType,
    pub value: String,
    pub ttl: u32,
}

/// Snapshot of cache counters for the periodic report.
#[derive(Debug, Clone, Default)]
pub struct CacheMetricsSnapshot {
    pub total_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub expirations: u64,
    pub hit_rate: f64,
}

pub trait ResponseCachePort: Send + Sync {
    /// Exact-key lookup; a hit restarts the entry's TTL window.
    fn lookup(&self, key: &str) -> Option<CachedAnswer>;

    /// Insert or refresh `key`. `None` TTL means the configured default.
    fn insert(&self, key: &str, record_type: RecordType, value: &str, ttl: Option<u32>);

    /// TTL given to entries inserted without one.
    fn default_ttl(&self) -> u32;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn metrics_snapshot(&self) -> CacheMetricsSnapshot;
}

use super::clock::{Clock, SystemClock};
use super::entry::CacheEntry;
use super::metrics::CacheMetrics;
use compact_str::CompactString;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;
use triedns_application::ports::{CacheMetricsSnapshot, CachedAnswer, ResponseCachePort};
use triedns_domain::{CacheConfig, RecordType};

pub const DEFAULT_BUCKETS: usize = 100;
pub const DEFAULT_TTL_SECS: u32 = 50;

/// Bucket index of `name`: `h = h * 32 + byte` over the exact bytes, so
/// names differing only in case land in different places.
pub fn hash_name(name: &str, buckets: usize) -> usize {
    let hash = name
        .bytes()
        .fold(0u32, |h, b| h.wrapping_shl(5).wrapping_add(u32::from(b)));
    hash as usize % buckets
}

/// Fixed array of buckets, each a chain of entries behind its own mutex.
///
/// Lookups sweep every bucket for expired entries before answering; a hit
/// restarts the entry's TTL window. At most one entry exists per name.
pub struct ResponseCache {
    buckets: Vec<Mutex<Vec<CacheEntry>>>,
    default_ttl: u32,
    clock: Arc<dyn Clock>,
    metrics: CacheMetrics,
}

impl ResponseCache {
    pub fn new(buckets: usize, default_ttl: u32) -> Self {
        Self::with_clock(buckets, default_ttl, Arc::new(SystemClock))
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.buckets, config.default_ttl)
    }

    pub fn with_clock(buckets: usize, default_ttl: u32, clock: Arc<dyn Clock>) -> Self {
        let buckets = buckets.max(1);
        Self {
            buckets: (0..buckets).map(|_| Mutex::new(Vec::new())).collect(),
            default_ttl,
            clock,
            metrics: CacheMetrics::default(),
        }
    }

    fn bucket(&self, name: &str) -> MutexGuard<'_, Vec<CacheEntry>> {
        self.buckets[hash_name(name, self.buckets.len())]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn get(&self, name: &str) -> Option<CacheEntry> {
        self.sweep();

        let mut bucket = self.bucket(name);
        let Some(index) = bucket.iter().position(|e| e.name == name) else {
            CacheMetrics::bump(&self.metrics.misses, 1);
            return None;
        };

        // The clock may have moved past the TTL since the sweep.
        let now = self.clock.now_secs();
        if bucket[index].is_expired(now) {
            bucket.remove(index);
            CacheMetrics::bump(&self.metrics.expirations, 1);
            CacheMetrics::bump(&self.metrics.misses, 1);
            return None;
        }

        let entry = &mut bucket[index];
        entry.inserted_at = now;
        CacheMetrics::bump(&self.metrics.hits, 1);
        Some(entry.clone())
    }

    pub fn put(&self, name: &str, record_type: RecordType, value: &str, ttl: Option<u32>) {
        let now = self.clock.now_secs();
        let ttl = ttl.unwrap_or(self.default_ttl);

        let mut bucket = self.bucket(name);
        if let Some(entry) = bucket.iter_mut().find(|e| e.name == name) {
            entry.record_type = record_type;
            entry.value.clear();
            entry.value.push_str(value);
            entry.ttl = ttl;
            entry.inserted_at = now;
        } else {
            bucket.insert(
                0,
                CacheEntry {
                    name: CompactString::new(name),
                    record_type,
                    value: value.to_string(),
                    ttl,
                    inserted_at: now,
                },
            );
        }
        CacheMetrics::bump(&self.metrics.insertions, 1);
    }

    /// Drops every expired entry, one bucket lock at a time.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now_secs();
        let mut removed = 0;

        for bucket in &self.buckets {
            let mut bucket = bucket.lock().unwrap_or_else(PoisonError::into_inner);
            let before = bucket.len();
            bucket.retain(|e| !e.is_expired(now));
            removed += before - bucket.len();
        }

        if removed > 0 {
            CacheMetrics::bump(&self.metrics.expirations, removed as u64);
            debug!(removed, "Cache sweep removed expired entries");
        }
        removed
    }

    /// Presence check straight on storage: no sweep, no TTL refresh.
    pub fn contains(&self, name: &str) -> bool {
        self.bucket(name).iter().any(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .map(|b| b.lock().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        for bucket in &self.buckets {
            bucket.lock().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKETS, DEFAULT_TTL_SECS)
    }
}

impl ResponseCachePort for ResponseCache {
    fn lookup(&self, key: &str) -> Option<CachedAnswer> {
        self.get(key).map(|entry| CachedAnswer {
            record_type: entry.record_type,
            value: entry.value,
            ttl: entry.ttl,
        })
    }

    fn insert(&self, key: &str, record_type: RecordType, value: &str, ttl: Option<u32>) {
        self.put(key, record_type, value, ttl);
    }

    fn default_ttl(&self) -> u32 {
        self.default_ttl
    }

    fn len(&self) -> usize {
        ResponseCache::len(self)
    }

    fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            total_entries: ResponseCache::len(self),
            hits: self.metrics.hits.load(Ordering::Relaxed),
            misses: self.metrics.misses.load(Ordering::Relaxed),
            insertions: self.metrics.insertions.load(Ordering::Relaxed),
            expirations: self.metrics.expirations.load(Ordering::Relaxed),
            hit_rate: self.metrics.hit_rate(),
        }
    }
}

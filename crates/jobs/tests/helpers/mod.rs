#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use triedns_application::ports::{
    CacheMetricsSnapshot, CachedAnswer, ResolverStats, ResolverStatsPort, ResponseCachePort,
};
use triedns_domain::RecordType;

#[derive(Default)]
pub struct MockResolverStats {
    calls: AtomicUsize,
}

impl MockResolverStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ResolverStatsPort for MockResolverStats {
    fn resolver_stats(&self) -> ResolverStats {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ResolverStats {
            queries: 10,
            timeouts: 2,
            format_errors: 1,
        }
    }
}

#[derive(Default)]
pub struct MockCache;

impl ResponseCachePort for MockCache {
    fn lookup(&self, _key: &str) -> Option<CachedAnswer> {
        None
    }

    fn insert(&self, _key: &str, _record_type: RecordType, _value: &str, _ttl: Option<u32>) {}

    fn default_ttl(&self) -> u32 {
        50
    }

    fn len(&self) -> usize {
        0
    }

    fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot::default()
    }
}

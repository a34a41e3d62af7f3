use std::sync::atomic::{AtomicU64, Ordering};
use triedns_application::ports::{ResolverStats, ResolverStatsPort};

/// Process-wide resolver statistics. The per-resolution query ceiling lives
/// in [`super::ResolutionContext`]; these are only reported.
#[derive(Debug, Default)]
pub struct ResolverCounters {
    queries: AtomicU64,
    timeouts: AtomicU64,
    format_errors: AtomicU64,
}

impl ResolverCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_format_error(&self) {
        self.format_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ResolverStats {
        ResolverStats {
            queries: self.queries.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            format_errors: self.format_errors.load(Ordering::Relaxed),
        }
    }
}

impl ResolverStatsPort for ResolverCounters {
    fn resolver_stats(&self) -> ResolverStats {
        self.snapshot()
    }
}

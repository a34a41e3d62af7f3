/// Process-wide upstream counters, reported periodically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolverStats {
    pub queries: u64,
    pub timeouts: u64,
    pub format_errors: u64,
}

pub trait ResolverStatsPort: Send + Sync {
    fn resolver_stats(&self) -> ResolverStats;
}

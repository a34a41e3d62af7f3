use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use triedns_application::ports::{ResolverStatsPort, ResponseCachePort};

const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Logs resolver counters and cache metrics on a fixed period.
pub struct ResolverStatsJob {
    resolver: Arc<dyn ResolverStatsPort>,
    cache: Arc<dyn ResponseCachePort>,
    interval_secs: u64,
    reports: AtomicU64,
    shutdown: CancellationToken,
}

impl ResolverStatsJob {
    pub fn new(resolver: Arc<dyn ResolverStatsPort>, cache: Arc<dyn ResponseCachePort>) -> Self {
        Self {
            resolver,
            cache,
            interval_secs: DEFAULT_INTERVAL_SECS,
            reports: AtomicU64::new(0),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, secs: u64) -> Self {
        self.interval_secs = secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn reports_emitted(&self) -> u64 {
        self.reports.load(Ordering::Relaxed)
    }

    pub fn report(&self) {
        let resolver = self.resolver.resolver_stats();
        let cache = self.cache.metrics_snapshot();

        info!(
            upstream_queries = resolver.queries,
            upstream_timeouts = resolver.timeouts,
            upstream_format_errors = resolver.format_errors,
            cache_entries = cache.total_entries,
            cache_hits = cache.hits,
            cache_misses = cache.misses,
            cache_expirations = cache.expirations,
            cache_hit_rate = format!("{:.1}%", cache.hit_rate),
            "Resolver statistics"
        );
        self.reports.fetch_add(1, Ordering::Relaxed);
    }

    pub async fn start(self: Arc<Self>) {
        if self.interval_secs == 0 {
            info!("ResolverStatsJob: disabled");
            return;
        }
        info!(interval_secs = self.interval_secs, "Starting resolver statistics job");

        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // the first tick completes immediately; nothing to report yet
        interval.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("ResolverStatsJob: shutting down");
                    break;
                }
                _ = interval.tick() => self.report(),
            }
        }
    }
}

mod dns_resolver;
mod resolver_stats;
mod response_cache;
mod zone_data_provider;
mod zone_lookup;

pub use dns_resolver::{DnsResolution, DnsResolver};
pub use resolver_stats::{ResolverStats, ResolverStatsPort};
pub use response_cache::{CacheMetricsSnapshot, CachedAnswer, ResponseCachePort};
pub use zone_data_provider::ZoneDataProvider;
pub use zone_lookup::ZoneLookup;

// Re-export for convenience
pub use triedns_domain::DnsQuery;

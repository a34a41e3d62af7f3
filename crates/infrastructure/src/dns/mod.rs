pub mod cache;
pub mod codec;
pub mod resolver;
pub mod server;
pub mod transport;
pub mod zone;

pub use cache::{CacheMetrics, Clock, ManualClock, ResponseCache, SystemClock};
pub use resolver::{
    AttemptOutcome, ForwardingResolver, IterativeResolver, ResolutionContext, ResolverCounters,
    RetryReason, UpstreamQuerier,
};
pub use server::DnsServerHandler;
pub use transport::{DnsTransport, NetworkTransport};
pub use zone::{ZoneFileProvider, ZoneStore};

pub mod clock;
pub mod entry;
pub mod metrics;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use metrics::CacheMetrics;
pub use storage::{hash_name, ResponseCache, DEFAULT_BUCKETS, DEFAULT_TTL_SECS};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_buckets")]
    pub buckets: usize,

    /// TTL applied when an answer does not carry one.
    #[serde(default = "default_ttl")]
    pub default_ttl: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            buckets: default_buckets(),
            default_ttl: default_ttl(),
        }
    }
}

fn default_buckets() -> usize {
    100
}

fn default_ttl() -> u32 {
    50
}

use compact_str::CompactString;
use triedns_domain::RecordType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub name: CompactString,
    pub record_type: RecordType,
    pub value: String,
    pub ttl: u32,
    pub inserted_at: u64,
}

impl CacheEntry {
    #[inline]
    pub fn age(&self, now_secs: u64) -> u64 {
        now_secs.saturating_sub(self.inserted_at)
    }

    #[inline]
    pub fn is_expired(&self, now_secs: u64) -> bool {
        self.age(now_secs) >= u64::from(self.ttl)
    }
}

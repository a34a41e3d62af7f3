use triedns_domain::{DomainError, NsSlot, SoaField};

/// Source of authoritative zone definitions, consulted once while the zone
/// trie is built. Every call may fail; any failure aborts startup.
///
/// Records of a zone are addressed by their position in
/// [`terminal_names`](ZoneDataProvider::terminal_names).
pub trait ZoneDataProvider: Send + Sync {
    fn zone_count(&self) -> Result<usize, DomainError>;

    fn zone_domains(&self) -> Result<Vec<String>, DomainError>;

    fn path_for_zone(&self, domain: &str) -> Result<String, DomainError>;

    fn soa_field(&self, path: &str, field: SoaField) -> Result<u32, DomainError>;

    fn ns_field(&self, path: &str, slot: NsSlot) -> Result<String, DomainError>;

    /// Fully qualified owner name of every record line, in file order.
    fn terminal_names(&self, path: &str) -> Result<Vec<String>, DomainError>;

    fn record_type(&self, path: &str, index: usize) -> Result<String, DomainError>;

    fn record_value(&self, path: &str, index: usize) -> Result<String, DomainError>;

    fn record_ttl(&self, path: &str, index: usize) -> Result<u32, DomainError>;
}

use triedns_domain::{DnsName, RecordType, ZoneAnswer};

/// Read-only view of the authoritative zone data.
pub trait ZoneLookup: Send + Sync {
    /// Answer for `name`, preferring a record of `record_type`. `None` means
    /// no managed zone could answer and the query should go upstream.
    fn lookup(&self, name: &DnsName, record_type: RecordType) -> Option<ZoneAnswer>;

    /// Indented dump of the zone hierarchy.
    fn render_tree(&self) -> String;

    fn zone_count(&self) -> usize;
}

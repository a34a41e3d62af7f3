#![allow(dead_code)]

use triedns_application::ports::ZoneDataProvider;
use triedns_domain::{DomainError, NsSlot, SoaField};

#[derive(Debug, Clone)]
pub struct MockZone {
    pub domain: String,
    pub ns: [String; 2],
    pub records: Vec<(String, String, String, u32)>,
}

impl MockZone {
    pub fn new(domain: &str, ns1: &str, ns2: &str) -> Self {
        Self {
            domain: domain.to_string(),
            ns: [ns1.to_string(), ns2.to_string()],
            records: Vec::new(),
        }
    }

    pub fn record(mut self, name: &str, record_type: &str, value: &str, ttl: u32) -> Self {
        self.records.push((
            name.to_string(),
            record_type.to_string(),
            value.to_string(),
            ttl,
        ));
        self
    }
}

/// In-memory provider; the "path" of a zone is its index in the list.
#[derive(Debug, Default)]
pub struct MockZoneProvider {
    pub zones: Vec<MockZone>,
    /// Overrides the reported zone count to exercise mismatch handling.
    pub reported_count: Option<usize>,
}

impl MockZoneProvider {
    pub fn new(zones: Vec<MockZone>) -> Self {
        Self {
            zones,
            reported_count: None,
        }
    }

    fn zone(&self, path: &str) -> Result<&MockZone, DomainError> {
        path.parse::<usize>()
            .ok()
            .and_then(|i| self.zones.get(i))
            .ok_or_else(|| DomainError::ZoneProvider(format!("no zone at {}", path)))
    }

    fn record(&self, path: &str, index: usize) -> Result<&(String, String, String, u32), DomainError> {
        self.zone(path)?
            .records
            .get(index)
            .ok_or_else(|| DomainError::ZoneProvider(format!("no record {}", index)))
    }
}

impl ZoneDataProvider for MockZoneProvider {
    fn zone_count(&self) -> Result<usize, DomainError> {
        Ok(self.reported_count.unwrap_or(self.zones.len()))
    }

    fn zone_domains(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.zones.iter().map(|z| z.domain.clone()).collect())
    }

    fn path_for_zone(&self, domain: &str) -> Result<String, DomainError> {
        self.zones
            .iter()
            .position(|z| z.domain == domain)
            .map(|i| i.to_string())
            .ok_or_else(|| DomainError::ZoneProvider(format!("unknown zone {}", domain)))
    }

    fn soa_field(&self, path: &str, field: SoaField) -> Result<u32, DomainError> {
        self.zone(path)?;
        Ok(match field {
            SoaField::Serial => 2024010101,
            SoaField::Refresh => 7200,
            SoaField::Retry => 3600,
            SoaField::Expire => 1209600,
            SoaField::Minimum => 300,
        })
    }

    fn ns_field(&self, path: &str, slot: NsSlot) -> Result<String, DomainError> {
        Ok(self.zone(path)?.ns[slot.index() - 1].clone())
    }

    fn terminal_names(&self, path: &str) -> Result<Vec<String>, DomainError> {
        Ok(self.zone(path)?.records.iter().map(|r| r.0.clone()).collect())
    }

    fn record_type(&self, path: &str, index: usize) -> Result<String, DomainError> {
        Ok(self.record(path, index)?.1.clone())
    }

    fn record_value(&self, path: &str, index: usize) -> Result<String, DomainError> {
        Ok(self.record(path, index)?.2.clone())
    }

    fn record_ttl(&self, path: &str, index: usize) -> Result<u32, DomainError> {
        Ok(self.record(path, index)?.3)
    }
}

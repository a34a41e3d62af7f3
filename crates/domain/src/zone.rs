use crate::{DnsName, RecordType};
use std::fmt;
use std::str::FromStr;

/// Label of the per-zone node that carries SOA metadata and NS delegation.
pub const ITSELF_LABEL: &str = "@";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoaField {
    Serial,
    Refresh,
    Retry,
    Expire,
    Minimum,
}

impl SoaField {
    pub const ALL: [SoaField; 5] = [
        SoaField::Serial,
        SoaField::Refresh,
        SoaField::Retry,
        SoaField::Expire,
        SoaField::Minimum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoaField::Serial => "serial",
            SoaField::Refresh => "refresh",
            SoaField::Retry => "retry",
            SoaField::Expire => "expire",
            SoaField::Minimum => "minimum",
        }
    }
}

impl FromStr for SoaField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoaField::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown SOA field: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoaMetadata {
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

impl SoaMetadata {
    pub fn set(&mut self, field: SoaField, value: u32) {
        match field {
            SoaField::Serial => self.serial = value,
            SoaField::Refresh => self.refresh = value,
            SoaField::Retry => self.retry = value,
            SoaField::Expire => self.expire = value,
            SoaField::Minimum => self.minimum = value,
        }
    }
}

/// Which of the two nameserver candidates of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NsSlot {
    First,
    Second,
}

impl NsSlot {
    pub fn index(&self) -> usize {
        match self {
            NsSlot::First => 1,
            NsSlot::Second => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsDelegation {
    pub first: DnsName,
    pub second: DnsName,
}

impl NsDelegation {
    pub fn candidate(&self, slot: NsSlot) -> &DnsName {
        match slot {
            NsSlot::First => &self.first,
            NsSlot::Second => &self.second,
        }
    }
}

/// An authoritative record held by the zone trie. The value is kept in its
/// presentation form (`93.184.216.34`, `10 mail.example.com`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
    pub record_type: RecordType,
    pub value: String,
    pub ttl: u32,
}

impl ZoneRecord {
    pub fn new(record_type: RecordType, value: impl Into<String>, ttl: u32) -> Self {
        Self {
            record_type,
            value: value.into(),
            ttl,
        }
    }
}

impl fmt::Display for ZoneRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.ttl, self.record_type, self.value)
    }
}

/// Result of an authoritative lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneAnswer {
    /// Name of the node the record was found on.
    pub owner: DnsName,
    pub record: ZoneRecord,
    /// Nameserver names followed to reach the record, outermost first.
    pub delegations: Vec<DnsName>,
}

impl ZoneAnswer {
    pub fn is_delegated(&self) -> bool {
        !self.delegations.is_empty()
    }
}

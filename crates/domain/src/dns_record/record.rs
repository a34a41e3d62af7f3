use super::RecordType;
use crate::DnsName;

pub const CLASS_IN: u16 = 1;

/// A resource record as it travels on the wire: owner, type, class, TTL and
/// opaque RDATA whose length is the RDLENGTH field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: DnsName,
    pub record_type: RecordType,
    pub class: u16,
    pub ttl: u32,
    pub rdata: Vec<u8>,
}

impl ResourceRecord {
    pub fn new(name: DnsName, record_type: RecordType, ttl: u32, rdata: Vec<u8>) -> Self {
        Self {
            name,
            record_type,
            class: CLASS_IN,
            ttl,
            rdata,
        }
    }
}

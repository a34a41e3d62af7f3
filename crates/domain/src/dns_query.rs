use crate::{DnsName, RecordType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub domain: DnsName,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: DnsName, record_type: RecordType) -> Self {
        Self {
            domain,
            record_type,
        }
    }

    /// Key under which answers for this query are cached: the name exactly
    /// as the client spelled it.
    pub fn cache_key(&self) -> String {
        self.domain.to_dotted()
    }
}

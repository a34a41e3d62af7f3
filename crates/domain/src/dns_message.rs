use crate::dns_record::{RecordType, ResourceRecord, CLASS_IN};
use crate::DnsName;

pub const OPCODE_QUERY: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    NoError,
    FormErr,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
    Other(u8),
}

impl ResponseCode {
    pub fn from_u8(code: u8) -> Self {
        match code & 0x0F {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NxDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }

    pub fn to_u8(&self) -> u8 {
        match self {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NxDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Other(code) => code & 0x0F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormErr => "FORMERR",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::NxDomain => "NXDOMAIN",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::Other(_) => "OTHER",
        }
    }
}

/// The flag word of the header (second 16-bit field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFlags {
    pub response: bool,
    pub opcode: u8,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub z: u8,
    pub rcode: ResponseCode,
}

impl Default for HeaderFlags {
    fn default() -> Self {
        Self {
            response: false,
            opcode: OPCODE_QUERY,
            authoritative: false,
            truncated: false,
            recursion_desired: false,
            recursion_available: false,
            z: 0,
            rcode: ResponseCode::NoError,
        }
    }
}

impl HeaderFlags {
    pub fn from_u16(bits: u16) -> Self {
        Self {
            response: bits & 0x8000 != 0,
            opcode: ((bits >> 11) & 0x0F) as u8,
            authoritative: bits & 0x0400 != 0,
            truncated: bits & 0x0200 != 0,
            recursion_desired: bits & 0x0100 != 0,
            recursion_available: bits & 0x0080 != 0,
            z: ((bits >> 4) & 0x07) as u8,
            rcode: ResponseCode::from_u8((bits & 0x0F) as u8),
        }
    }

    pub fn to_u16(&self) -> u16 {
        let mut bits = 0u16;
        if self.response {
            bits |= 0x8000;
        }
        bits |= u16::from(self.opcode & 0x0F) << 11;
        if self.authoritative {
            bits |= 0x0400;
        }
        if self.truncated {
            bits |= 0x0200;
        }
        if self.recursion_desired {
            bits |= 0x0100;
        }
        if self.recursion_available {
            bits |= 0x0080;
        }
        bits |= u16::from(self.z & 0x07) << 4;
        bits | u16::from(self.rcode.to_u8())
    }
}

/// The fixed 12-byte header, counts included, as read from or written to the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub id: u16,
    pub flags: HeaderFlags,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: DnsName,
    pub qtype: RecordType,
    pub qclass: u16,
}

impl Question {
    pub fn new(name: DnsName, qtype: RecordType) -> Self {
        Self {
            name,
            qtype,
            qclass: CLASS_IN,
        }
    }
}

/// In-memory DNS message. Section counts are not stored: they are always the
/// lengths of the section vectors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DnsMessage {
    pub id: u16,
    pub flags: HeaderFlags,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl DnsMessage {
    pub fn query(id: u16, name: DnsName, qtype: RecordType, recursion_desired: bool) -> Self {
        Self {
            id,
            flags: HeaderFlags {
                recursion_desired,
                ..HeaderFlags::default()
            },
            questions: vec![Question::new(name, qtype)],
            ..Self::default()
        }
    }

    pub fn header(&self) -> Header {
        Header {
            id: self.id,
            flags: self.flags,
            qdcount: self.questions.len() as u16,
            ancount: self.answers.len() as u16,
            nscount: self.authorities.len() as u16,
            arcount: self.additionals.len() as u16,
        }
    }

    pub fn question(&self) -> Option<&Question> {
        self.questions.first()
    }

    /// Advertises `payload_size` through an OPT pseudo-record, replacing any
    /// previous one.
    pub fn set_edns(&mut self, payload_size: u16) {
        self.clear_edns();
        self.additionals.push(ResourceRecord {
            name: DnsName::root(),
            record_type: RecordType::OPT,
            class: payload_size,
            ttl: 0,
            rdata: Vec::new(),
        });
    }

    pub fn clear_edns(&mut self) {
        self.additionals
            .retain(|rr| rr.record_type != RecordType::OPT);
    }

    pub fn edns_payload_size(&self) -> Option<u16> {
        self.additionals
            .iter()
            .find(|rr| rr.record_type == RecordType::OPT)
            .map(|rr| rr.class)
    }

    pub fn answers_of(&self, record_type: RecordType) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .filter(move |rr| rr.record_type == record_type)
    }
}

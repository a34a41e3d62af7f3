//! TrieDNS Domain Layer
pub mod client_request;
pub mod config;
pub mod dns_message;
pub mod dns_name;
pub mod dns_protocol;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod zone;

pub use client_request::{ClientRequest, DUMP_TRIE_COMMAND, NOT_FOUND_REPLY};
pub use config::{
    parse_server_address, CacheConfig, CliOverrides, Config, ConfigError, LoggingConfig,
    ResolverConfig, ResolverMode, ServerConfig, ZonesConfig, DEFAULT_DNS_PORT,
};
pub use dns_message::{DnsMessage, Header, HeaderFlags, Question, ResponseCode};
pub use dns_name::{DnsName, MAX_LABEL_LEN, MAX_NAME_LEN};
pub use dns_protocol::DnsProtocol;
pub use dns_query::DnsQuery;
pub use dns_record::{RecordType, ResourceRecord, CLASS_IN};
pub use errors::{DomainError, WireError};
pub use zone::{NsDelegation, NsSlot, SoaField, SoaMetadata, ZoneAnswer, ZoneRecord, ITSELF_LABEL};

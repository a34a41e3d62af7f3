use crate::{DnsName, DomainError};

pub const DUMP_TRIE_COMMAND: &str = "trie";
pub const NOT_FOUND_REPLY: &str = "NOT FOUND";

/// One line of the text protocol spoken on the client port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientRequest {
    Lookup(DnsName),
    DumpTrie,
}

impl ClientRequest {
    pub fn parse(line: &str) -> Result<Self, DomainError> {
        let trimmed = line.trim_matches(|c: char| c.is_whitespace() || c == '\0');
        if trimmed.is_empty() {
            return Err(DomainError::InvalidDomainName("empty request".to_string()));
        }
        if trimmed == DUMP_TRIE_COMMAND {
            return Ok(ClientRequest::DumpTrie);
        }
        trimmed
            .parse::<DnsName>()
            .map(ClientRequest::Lookup)
            .map_err(|e| DomainError::InvalidDomainName(format!("{}: {}", trimmed, e)))
    }
}

use thiserror::Error;

/// Failures of the binary message codec.
///
/// Every variant describes a single bad buffer; none of them is fatal to the
/// server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("Truncated input: needed {needed} bytes at offset {offset}, buffer has {available}")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Malformed compression pointer at offset {offset} (target {target})")]
    MalformedCompression { offset: usize, target: usize },

    #[error("Domain name exceeds 255 bytes")]
    NameTooLong,

    #[error("Label of {0} bytes exceeds 63 bytes")]
    LabelTooLong(usize),

    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    #[error("Encoded message needs {needed} bytes, limit is {limit}")]
    BufferTooSmall { needed: usize, limit: usize },

    #[error("Invalid record data: {0}")]
    InvalidRecordData(String),
}

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Malformed DNS message: {0}")]
    MalformedMessage(#[from] WireError),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Too many queries (ceiling {limit})")]
    TooManyQueries { limit: u32 },

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Resolution failed after {attempts} attempts")]
    ResolutionFailed { attempts: u32 },

    #[error("Domain not found (NXDOMAIN)")]
    NxDomain,

    #[error("Upstream answer carried no usable record")]
    NoAnswer,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Zone data provider failure: {0}")]
    ZoneProvider(String),

    #[error("Connection queue is full")]
    QueueFull,

    #[error("Transport error with {server}: {reason}")]
    Transport { server: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// True for the errors that mean "the name does not exist" rather than
    /// "resolution broke".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::NxDomain | DomainError::NoAnswer | DomainError::NotFound(_)
        )
    }
}

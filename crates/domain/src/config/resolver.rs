use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Port assumed for a server entry written as a bare IP address.
pub const DEFAULT_DNS_PORT: u16 = 53;

/// Parses a server entry: `ip:port`, `[v6]:port`, or a bare IP on port 53.
pub fn parse_server_address(entry: &str) -> Result<SocketAddr, String> {
    let entry = entry.trim();
    if let Ok(addr) = entry.parse::<SocketAddr>() {
        return Ok(addr);
    }
    entry
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
        .map_err(|_| format!("invalid server address {:?}", entry))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResolverMode {
    /// Send the query with RD set to the configured upstream resolvers.
    #[default]
    Forward,
    /// Walk the delegation chain from the root hints with RD clear.
    Iterative,
}

impl fmt::Display for ResolverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverMode::Forward => f.write_str("forward"),
            ResolverMode::Iterative => f.write_str("iterative"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub mode: ResolverMode,

    #[serde(default = "default_upstream_servers")]
    pub upstream_servers: Vec<String>,

    #[serde(default = "default_root_hints")]
    pub root_hints: Vec<String>,

    /// Attempt budget of one upstream query.
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,

    /// Bound on the whole upstream step of one resolution.
    #[serde(default = "default_forward_timeout_secs")]
    pub forward_timeout_secs: u64,

    /// UDP payload size advertised through EDNS.
    #[serde(default = "default_edns_payload_size")]
    pub edns_payload_size: u16,

    /// Maximum number of upstream sends one resolution may perform.
    #[serde(default = "default_query_ceiling")]
    pub query_ceiling: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            mode: ResolverMode::default(),
            upstream_servers: default_upstream_servers(),
            root_hints: default_root_hints(),
            attempts: default_attempts(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            forward_timeout_secs: default_forward_timeout_secs(),
            edns_payload_size: default_edns_payload_size(),
            query_ceiling: default_query_ceiling(),
        }
    }
}

fn default_upstream_servers() -> Vec<String> {
    vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()]
}

fn default_root_hints() -> Vec<String> {
    vec![
        "198.41.0.4:53".to_string(),
        "192.5.5.241:53".to_string(),
        "193.0.14.129:53".to_string(),
    ]
}

fn default_attempts() -> u32 {
    4
}

fn default_attempt_timeout_ms() -> u64 {
    1000
}

fn default_forward_timeout_secs() -> u64 {
    5
}

fn default_edns_payload_size() -> u16 {
    1500
}

fn default_query_ceiling() -> u32 {
    64
}

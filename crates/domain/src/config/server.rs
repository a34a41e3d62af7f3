use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    /// Port of the line-oriented text protocol (`domain` in, value out).
    #[serde(default = "default_client_port")]
    pub client_port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Concurrent client connections; extra connections are dropped.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dns_port: default_dns_port(),
            client_port: default_client_port(),
            bind_address: default_bind_address(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_dns_port() -> u16 {
    53
}

fn default_client_port() -> u16 {
    8081
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_max_connections() -> usize {
    64
}

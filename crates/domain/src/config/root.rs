use serde::{Deserialize, Serialize};

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::{parse_server_address, ResolverConfig, ResolverMode};
use super::server::ServerConfig;
use super::zones::ZonesConfig;

/// Main configuration structure for TrieDNS
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    /// Listener configuration (ports, bind address, connection limit)
    pub server: ServerConfig,

    /// Upstream resolution configuration
    pub resolver: ResolverConfig,

    pub cache: CacheConfig,

    /// Authoritative zone data
    pub zones: ZonesConfig,

    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. triedns.toml in current directory
    /// 3. /etc/triedns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(port) = overrides.client_port {
            self.server.client_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(index) = overrides.zones_index {
            self.zones.index = Some(index);
        }
        if !overrides.upstream_servers.is_empty() {
            self.resolver.upstream_servers = overrides.upstream_servers;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.server.client_port == 0 {
            return Err(ConfigError::Validation(
                "Client port cannot be 0".to_string(),
            ));
        }

        match self.resolver.mode {
            ResolverMode::Forward if self.resolver.upstream_servers.is_empty() => {
                return Err(ConfigError::Validation(
                    "No upstream servers configured".to_string(),
                ));
            }
            ResolverMode::Iterative if self.resolver.root_hints.is_empty() => {
                return Err(ConfigError::Validation(
                    "Iterative mode needs at least one root hint".to_string(),
                ));
            }
            _ => {}
        }

        for (kind, entries) in [
            ("upstream server", &self.resolver.upstream_servers),
            ("root hint", &self.resolver.root_hints),
        ] {
            for entry in entries {
                parse_server_address(entry)
                    .map_err(|e| ConfigError::Validation(format!("{}: {}", kind, e)))?;
            }
        }

        if self.resolver.attempts == 0 {
            return Err(ConfigError::Validation(
                "Resolver attempts must be at least 1".to_string(),
            ));
        }

        if self.cache.buckets == 0 {
            return Err(ConfigError::Validation(
                "Cache needs at least one bucket".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new("triedns.toml").exists() {
            Some("triedns.toml".to_string())
        } else if std::path::Path::new("/etc/triedns/config.toml").exists() {
            Some("/etc/triedns/config.toml".to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub client_port: Option<u16>,
    pub bind_address: Option<String>,
    pub zones_index: Option<String>,
    pub upstream_servers: Vec<String>,
    pub log_level: Option<String>,
}

pub mod cache;
pub mod errors;
pub mod logging;
pub mod resolver;
pub mod root;
pub mod server;
pub mod zones;

pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use resolver::{parse_server_address, ResolverConfig, ResolverMode, DEFAULT_DNS_PORT};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use zones::ZonesConfig;

pub mod client;
pub mod dns;

pub use client::start_client_server;
pub use dns::{start_dns_server, start_dns_tcp_server};

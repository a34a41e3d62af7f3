pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use triedns_domain::{DnsProtocol, DomainError};

/// One request/response exchange with an upstream server. A timeout must be
/// reported as [`DomainError::QueryTimeout`]; other failures as
/// [`DomainError::Transport`].
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn exchange(
        &self,
        server: SocketAddr,
        protocol: DnsProtocol,
        message: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError>;
}

/// Real sockets: one fresh UDP socket or TCP connection per exchange.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetworkTransport;

#[async_trait]
impl DnsTransport for NetworkTransport {
    async fn exchange(
        &self,
        server: SocketAddr,
        protocol: DnsProtocol,
        message: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        match protocol {
            DnsProtocol::Udp => udp::UdpTransport::new(server).send(message, timeout).await,
            DnsProtocol::Tcp => tcp::TcpTransport::new(server).send(message, timeout).await,
        }
    }
}

pub(crate) fn transport_error(server: SocketAddr, reason: impl std::fmt::Display) -> DomainError {
    DomainError::Transport {
        server: server.to_string(),
        reason: reason.to_string(),
    }
}

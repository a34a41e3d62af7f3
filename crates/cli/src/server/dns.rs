use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use triedns_domain::DnsProtocol;
use triedns_infrastructure::dns::transport::tcp::{
    read_with_length_prefix, send_with_length_prefix,
};
use triedns_infrastructure::dns::DnsServerHandler;

/// Largest datagram we accept from clients.
const MAX_QUERY_SIZE: usize = 4096;

/// A TCP client that sends nothing for this long is disconnected.
const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn start_dns_server(
    bind_addr: String,
    handler: Arc<DnsServerHandler>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let socket = Arc::new(create_udp_socket(socket_addr)?);

    info!(bind_address = %socket_addr, "DNS server ready (UDP)");

    let mut recv_buf = vec![0u8; MAX_QUERY_SIZE];
    loop {
        let (n, from) = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("DNS server: shutting down");
                return Ok(());
            }
            received = socket.recv_from(&mut recv_buf) => match received {
                Ok(received) => received,
                Err(e) => {
                    error!(error = %e, "UDP recv error");
                    continue;
                }
            },
        };

        let packet: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let handler = handler.clone();
        let socket = socket.clone();
        tokio::spawn(async move {
            if let Some(response) = handler.handle(&packet, from, DnsProtocol::Udp).await {
                if let Err(e) = socket.send_to(&response, from).await {
                    debug!(client = %from, error = %e, "Failed to send response");
                }
            }
        });
    }
}

/// DNS over TCP on the same port, for clients retrying a truncated answer.
pub async fn start_dns_tcp_server(
    bind_addr: String,
    handler: Arc<DnsServerHandler>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let listener = create_tcp_listener(socket_addr)?;

    info!(bind_address = %socket_addr, "DNS server ready (TCP)");
    serve_tcp(listener, handler, shutdown).await
}

async fn serve_tcp(
    listener: TcpListener,
    handler: Arc<DnsServerHandler>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("DNS TCP server: shutting down");
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "TCP accept error");
                    continue;
                }
            },
        };

        let handler = handler.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_tcp_connection(stream, peer, &handler).await {
                debug!(client = %peer, error = %e, "DNS TCP connection closed");
            }
        });
    }
}

/// Answers length-prefixed queries until the client closes the connection
/// or goes idle.
async fn serve_tcp_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    handler: &DnsServerHandler,
) -> std::io::Result<()> {
    stream.set_nodelay(true)?;

    loop {
        let read = tokio::time::timeout(TCP_IDLE_TIMEOUT, read_with_length_prefix(&mut stream));
        let query = match read.await {
            Ok(Ok(query)) => query,
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(()),
            Ok(Err(e)) => return Err(e),
            Err(_) => return Ok(()),
        };

        match handler.handle(&query, peer, DnsProtocol::Tcp).await {
            Some(response) => send_with_length_prefix(&mut stream, &response).await?,
            None => return Ok(()),
        }
    }
}

fn create_udp_socket(socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use triedns_application::use_cases::ResolveNameUseCase;
    use triedns_domain::{DnsMessage, RecordType, ResolverConfig};
    use triedns_infrastructure::dns::codec::{decode_message, encode_message, rdata_to_text};
    use triedns_infrastructure::dns::{
        ForwardingResolver, NetworkTransport, ResolverCounters, ResponseCache, UpstreamQuerier,
        ZoneStore,
    };

    fn cached_handler() -> Arc<DnsServerHandler> {
        let cache = Arc::new(ResponseCache::default());
        cache.put("example.com", RecordType::A, "93.184.216.34", Some(300));
        cache.put("big.example.com", RecordType::TXT, &"y".repeat(700), Some(300));

        let config = ResolverConfig::default();
        let querier = Arc::new(UpstreamQuerier::new(
            Arc::new(NetworkTransport),
            Arc::new(ResolverCounters::new()),
            &config,
        ));
        let resolve = Arc::new(ResolveNameUseCase::new(
            cache,
            Arc::new(ZoneStore::empty()),
            Arc::new(ForwardingResolver::new(querier, &config)),
        ));
        Arc::new(DnsServerHandler::new(resolve, config.edns_payload_size))
    }

    async fn spawn_tcp_server() -> (SocketAddr, CancellationToken) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        tokio::spawn(serve_tcp(listener, cached_handler(), shutdown.clone()));
        (addr, shutdown)
    }

    async fn exchange(stream: &mut TcpStream, query: &DnsMessage) -> DnsMessage {
        let bytes = encode_message(query, 512).unwrap();
        send_with_length_prefix(stream, &bytes).await.unwrap();
        let reply = tokio::time::timeout(Duration::from_secs(3), read_with_length_prefix(stream))
            .await
            .expect("no answer over TCP")
            .unwrap();
        decode_message(&reply).unwrap()
    }

    #[tokio::test]
    async fn test_tcp_answers_framed_queries_on_one_connection() {
        let (addr, shutdown) = spawn_tcp_server().await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        let first = DnsMessage::query(1, "example.com".parse().unwrap(), RecordType::A, true);
        let response = exchange(&mut stream, &first).await;
        assert_eq!(response.id, 1);
        assert_eq!(
            rdata_to_text(RecordType::A, &response.answers[0].rdata).unwrap(),
            "93.184.216.34"
        );

        let second = DnsMessage::query(2, "example.com".parse().unwrap(), RecordType::A, true);
        assert_eq!(exchange(&mut stream, &second).await.id, 2);
        shutdown.cancel();
    }

    #[tokio::test]
    async fn test_tcp_carries_answers_too_big_for_udp() {
        let (addr, shutdown) = spawn_tcp_server().await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        let name = "big.example.com".parse().unwrap();
        let query = DnsMessage::query(7, name, RecordType::TXT, true);
        let response = exchange(&mut stream, &query).await;

        assert!(!response.flags.truncated);
        assert_eq!(response.answers.len(), 1);
        shutdown.cancel();
    }
}

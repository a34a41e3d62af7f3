//! Lookup service for plain text clients: the client sends a domain name (or
//! `trie`), gets one reply, and the connection is closed.
//!
//! Clients are not required to terminate the request with a newline or to
//! half-close the socket; a pause after the first bytes ends the request too.

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use triedns_application::use_cases::HandleClientRequestUseCase;
use triedns_domain::DomainError;

const MAX_REQUEST_LEN: usize = 1024;
const READ_TIMEOUT: Duration = Duration::from_secs(10);
const IDLE_GAP: Duration = Duration::from_millis(200);

pub async fn start_client_server(
    bind_addr: String,
    use_case: Arc<HandleClientRequestUseCase>,
    max_connections: usize,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let listener = create_tcp_listener(socket_addr)?;

    info!(bind_address = %socket_addr, max_connections, "Client server ready");
    serve_clients(listener, use_case, max_connections, shutdown).await
}

async fn serve_clients(
    listener: TcpListener,
    use_case: Arc<HandleClientRequestUseCase>,
    max_connections: usize,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let permits = Arc::new(Semaphore::new(max_connections));

    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Client server: shutting down");
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

        let permit = match permits.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!(client = %peer, error = %DomainError::QueueFull, "Dropping connection");
                drop(stream);
                continue;
            }
        };

        let use_case = use_case.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_connection(stream, &use_case).await {
                debug!(client = %peer, error = %e, "Client connection failed");
            }
            drop(permit);
        });
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    use_case: &HandleClientRequestUseCase,
) -> std::io::Result<()> {
    let (mut reader, mut writer) = stream.split();

    let request = read_request(&mut reader).await?;
    let line = String::from_utf8_lossy(&request);
    let reply = use_case.execute(&line).await;

    writer.write_all(reply.as_bytes()).await?;
    writer.shutdown().await
}

/// Reads one request: everything up to a newline, EOF, `MAX_REQUEST_LEN`
/// bytes, or `IDLE_GAP` of silence once something has arrived. The newline
/// itself is not part of the request.
async fn read_request<R: AsyncRead + Unpin>(reader: &mut R) -> std::io::Result<Vec<u8>> {
    let mut request = Vec::with_capacity(64);
    let mut chunk = [0u8; 256];
    let mut wait = READ_TIMEOUT;

    loop {
        let n = match tokio::time::timeout(wait, reader.read(&mut chunk)).await {
            Ok(read) => read?,
            Err(_) if !request.is_empty() => break,
            Err(_) => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "request timed out",
                ))
            }
        };
        if n == 0 {
            break;
        }
        request.extend_from_slice(&chunk[..n]);
        if request.contains(&b'\n') || request.len() >= MAX_REQUEST_LEN {
            break;
        }
        wait = IDLE_GAP;
    }

    if let Some(end) = request.iter().position(|&b| b == b'\n') {
        request.truncate(end);
    }
    request.truncate(MAX_REQUEST_LEN);
    Ok(request)
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

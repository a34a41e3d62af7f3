use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use triedns_application::ports::{ResolverStatsPort, ResponseCachePort};
use triedns_domain::CliOverrides;
use triedns_jobs::{JobRunner, ResolverStatsJob};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "triedns")]
#[command(version)]
#[command(about = "TrieDNS - authoritative zone trie with a caching, forwarding resolver")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS (wire protocol) port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Text protocol port
    #[arg(short = 'p', long)]
    client_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Zone index file
    #[arg(short = 'z', long, value_name = "FILE")]
    zones: Option<String>,

    /// Upstream resolver (ip:port), repeatable
    #[arg(short = 'u', long = "upstream", value_name = "ADDR")]
    upstream: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        client_port: cli.client_port,
        bind_address: cli.bind,
        zones_index: cli.zones,
        upstream_servers: cli.upstream,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    info!("Starting TrieDNS v{}", env!("CARGO_PKG_VERSION"));

    let services = di::DnsServices::new(&config)?;
    let shutdown = CancellationToken::new();

    let stats_job = ResolverStatsJob::new(
        services.counters.clone() as Arc<dyn ResolverStatsPort>,
        services.cache.clone() as Arc<dyn ResponseCachePort>,
    )
    .with_interval(config.logging.stats_interval_secs);
    JobRunner::new()
        .with_resolver_stats(stats_job)
        .with_shutdown_token(shutdown.clone())
        .start();

    let dns_addr = format!("{}:{}", config.server.bind_address, config.server.dns_port);
    let dns_handler = Arc::new(services.dns_handler(&config));

    let udp_addr = dns_addr.clone();
    let udp_handler = dns_handler.clone();
    let udp_shutdown = shutdown.clone();
    let dns_task = tokio::spawn(async move {
        if let Err(e) = server::start_dns_server(udp_addr, udp_handler, udp_shutdown).await {
            error!(error = %e, "DNS server error");
        }
    });

    let tcp_shutdown = shutdown.clone();
    let dns_tcp_task = tokio::spawn(async move {
        if let Err(e) = server::start_dns_tcp_server(dns_addr, dns_handler, tcp_shutdown).await {
            error!(error = %e, "DNS TCP server error");
        }
    });

    let client_addr = format!("{}:{}", config.server.bind_address, config.server.client_port);
    let client_use_case = services.client_requests.clone();
    let client_shutdown = shutdown.clone();
    let max_connections = config.server.max_connections;
    let client_task = tokio::spawn(async move {
        if let Err(e) = server::start_client_server(
            client_addr,
            client_use_case,
            max_connections,
            client_shutdown,
        )
        .await
        {
            error!(error = %e, "Client server error");
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    shutdown.cancel();

    let _ = tokio::join!(dns_task, dns_tcp_task, client_task);
    info!("Server shutdown complete");
    Ok(())
}

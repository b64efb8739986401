use anyhow::Result;
use clap::Args;
use matchgate::server::{start_server, ServerConfig};
use matchgate::{MatchGateway, MatchgateConfig};
use tokio_util::sync::CancellationToken;

/// Arguments for the Serve command
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind to, overrides the configured address
    #[clap(short, long)]
    pub address: Option<String>,

    /// Port to listen on, overrides the configured port
    #[clap(short, long)]
    pub port: Option<u16>,
}

pub async fn run(config: &MatchgateConfig, gateway: MatchGateway, args: ServeArgs) -> Result<()> {
    let mut server_config = ServerConfig::from_config(config);
    if let Some(address) = args.address {
        server_config = server_config.with_address(address);
    }
    if let Some(port) = args.port {
        server_config = server_config.with_port(port);
    }

    match config.default_platform {
        Some(platform) => tracing::info!("default platform: {}", platform.tag()),
        None => tracing::info!("no default platform configured"),
    }

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for shutdown signal: {}", e);
            return;
        }
        tracing::info!("shutdown signal received");
        signal.cancel();
    });

    start_server(gateway, server_config, shutdown).await
}

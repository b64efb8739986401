#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use matchgate::pipeline::upstream::UpstreamPipeline;
use matchgate::{MatchGateway, MatchgateConfig};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::config::ConfigArgs;
use commands::fetch::FetchArgs;
use commands::serve::ServeArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.matchgate/matchgate.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the match endpoints over HTTP
    Serve(ServeArgs),

    /// Show the loaded configuration
    Config(ConfigArgs),

    /// Fetch a single result through the upstream pipeline
    Fetch(FetchArgs),
}

fn build_gateway(config: &MatchgateConfig) -> MatchGateway {
    MatchGateway::new(
        Arc::new(config.platform_registry()),
        Arc::new(UpstreamPipeline::from_config(config)),
    )
}

async fn run(cli: Cli, config: MatchgateConfig) -> Result<()> {
    match cli.command {
        Commands::Serve(args) => {
            let gateway = build_gateway(&config);
            commands::serve::run(&config, gateway, args).await
        }
        Commands::Config(args) => commands::config::run(&config, args),
        Commands::Fetch(args) => {
            let gateway = build_gateway(&config);
            commands::fetch::run(&gateway, args).await
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.debug {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("matchgate=debug,tower_http=debug"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = match MatchgateConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, config).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

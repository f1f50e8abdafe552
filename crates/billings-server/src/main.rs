//! Billings server binary
//!
//! Starts the HTTP server that receives notification batches.

use billings_server::{config::ServerConfig, start_server};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Billings - turn phone notifications into a transaction log.
#[derive(Debug, Parser)]
#[command(name = "billings-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, env = "BILLINGS_CONFIG")]
    config: Option<String>,

    /// Override the configured bind port
    #[arg(long)]
    bind_port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => {
            tracing::warn!("No config file specified, using defaults");
            ServerConfig::default()
        }
    };

    if let Some(port) = cli.bind_port {
        config.bind_port = port;
        config.validate()?;
    }

    start_server(config).await?;

    Ok(())
}

//! Opsdeck CLI
//!
//! Command-line interface for the dashboard synchronization engine.

use std::path::PathBuf;

use clap::Parser;
use opsdeck::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "opsdeck")]
#[command(about = "Live service-monitoring dashboard engine")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }

    tracing::info!(
        "Starting opsdeck against {} (poll every {}s)",
        config.base_url,
        config.poll_interval_seconds
    );

    opsdeck::run(config).await?;

    Ok(())
}

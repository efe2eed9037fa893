use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use podview::config::{Cli, GatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = GatewayConfig::from_cli(&cli)?;
    podview::server::run_with_config(config).await
}

use anyhow::Result;
use clap::Parser;
use resume_analyzer::cli::{handle_command, AnalyzerCli};
use resume_analyzer::core::ConfigManager;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging first
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("resume_analyzer=info,rocket=warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = AnalyzerCli::parse();

    info!("Starting resume analyzer v{}", env!("CARGO_PKG_VERSION"));
    let config = ConfigManager::load()?;

    handle_command(cli, config).await
}

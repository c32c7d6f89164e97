use anyhow::{Context, Result};
use clap::Parser;
use cv_search::cli::{handle_command, Cli};
use cv_search::config::ClientConfig;
use std::fs::OpenOptions;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ClientConfig::load()?;

    // Logs go to a file so they never mix with command output
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Environment: {}", ClientConfig::environment());
    info!("Candidate Service: {}", config.service_url);
    info!("Detail path: {:?}", config.detail_path);

    handle_command(cli, config).await
}

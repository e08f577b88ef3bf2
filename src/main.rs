use anyhow::Context;
use clap::{Parser, Subcommand};
use invoice_api::config::AppConfig;
use invoice_api::server::ServerBuilder;
use invoice_api::storage::StoreHandle;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// HTTP API for managing invoices.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Optional YAML configuration file, overridden by environment variables.
    #[arg(long, env = "INVOICE_API_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply migrations and serve the API (default).
    Serve,
    /// Apply migrations and exit.
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("invoice_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let backend = config.backend();
    tracing::info!(
        environment = ?config.environment,
        backend = backend.as_str(),
        "Configuration loaded"
    );

    let handle = StoreHandle::connect(backend, &config.store)
        .await
        .context("Failed to connect to the invoice store")?;
    handle
        .migrate()
        .await
        .context("Failed to run database migrations")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Migrate => Ok(()),
        Commands::Serve => {
            ServerBuilder::new()
                .with_shared_store(handle.into_store())
                .with_environment(config.environment)
                .with_server_config(&config.server)
                .serve(&config.server.bind_addr)
                .await
        }
    }
}

//! Replog - Quorum-Replicated Append-Only Message Log
//!
//! Process entry point: CLI parsing, config loading, logging setup, and
//! node startup with graceful shutdown.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use replog::api::HttpServer;
use replog::config::ReplogConfig;
use replog::coordinator::LogCoordinator;
use replog::error::Result;
use replog::network::HttpReplicaClient;

/// Replog - Quorum-Replicated Append-Only Message Log
#[derive(Parser)]
#[command(name = "replog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "replog.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the replog node
    Start {
        /// Override the listen address (host:port)
        #[arg(long)]
        listen: Option<String>,

        /// Override the secondary endpoints; repeatable.
        /// Any secondaries make this node the primary.
        #[arg(long = "secondary")]
        secondaries: Vec<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "replog.toml")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Start { listen, secondaries } => {
            run_start(cli.config, listen, secondaries).await
        }
        Commands::Init { output } => run_init(output),
        Commands::Validate => run_validate(cli.config),
    }
}

/// Initialize logging
fn init_logging(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Start the replog node
async fn run_start(
    config_path: PathBuf,
    listen: Option<String>,
    secondaries: Vec<String>,
) -> Result<()> {
    // The config file is optional when overrides are given on the command line
    let mut config = if config_path.exists() {
        ReplogConfig::from_file(&config_path)?
    } else {
        tracing::info!(path = %config_path.display(), "No config file found, using defaults");
        ReplogConfig::default()
    };

    if let Some(listen) = listen {
        config.node.listen_address = listen;
    }
    if !secondaries.is_empty() {
        config.node.secondaries = secondaries;
    }
    config.validate()?;

    tracing::info!(
        role = %config.role(),
        listen = %config.node.listen_address,
        secondaries = config.node.secondaries.len(),
        "Starting replog node"
    );

    let transport = Arc::new(HttpReplicaClient::new(config.request_timeout())?);
    let listen_address = config.node.listen_address.clone();
    let coordinator = Arc::new(LogCoordinator::new(config, transport));

    let server = HttpServer::new(listen_address, coordinator);
    server
        .start(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    tracing::info!("Node stopped");
    Ok(())
}

/// Write a starter configuration file
fn run_init(output: PathBuf) -> Result<()> {
    let config = ReplogConfig::default();
    let content = toml::to_string_pretty(&config)
        .map_err(|e| replog::Error::Config(format!("Failed to render config: {}", e)))?;

    std::fs::write(&output, content)?;
    tracing::info!(path = %output.display(), "Configuration written");
    Ok(())
}

/// Validate a configuration file
fn run_validate(config_path: PathBuf) -> Result<()> {
    let config = ReplogConfig::from_file(&config_path)?;
    tracing::info!(
        role = %config.role(),
        listen = %config.node.listen_address,
        "Configuration is valid"
    );
    Ok(())
}

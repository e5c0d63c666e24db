//! CLI command definitions and dispatch.

pub mod all;
pub mod api;
pub mod notifier;

use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use tweet_core::AppResult;
use tweet_core::config::AppConfig;

/// Tweet backend: comment API and real-time notification fan-out
#[derive(Debug, Parser)]
#[command(name = "tweet", version, about, long_about = None)]
pub struct Cli {
    /// Configuration overlay to load from `config/{env}.toml`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Process to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the writer (REST API) process
    Api(ServeArgs),
    /// Run the notifier (WebSocket) process
    Notifier(ServeArgs),
    /// Run both processes in one
    All,
}

/// Listener overrides
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            env = %self.env,
            "Starting tweet backend"
        );

        match &self.command {
            Commands::Api(args) => api::execute(args, config).await,
            Commands::Notifier(args) => notifier::execute(args, config).await,
            Commands::All => all::execute(config).await,
        }
    }
}

/// Returns a token cancelled on Ctrl+C or SIGTERM.
pub fn shutdown_on_signal() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, starting graceful shutdown");
        trigger.cancel();
    });
    token
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

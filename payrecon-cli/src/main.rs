//! payrecon
//!
//! Command-line client for the payment-reconciliation backend: grouped
//! payment lists, integrations, fiscal receipts, forwarding logs and
//! webhook token tooling.

mod commands;
mod config;
mod output;
mod state;

use clap::Parser;
use commands::{Command, integrations, payments, receipts, webhook_logs, webhook_test};
use config::{ConfigLoader, Overrides};
use state::AppState;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// payrecon - payment reconciliation from the command line
#[derive(Parser, Debug)]
#[command(name = "payrecon")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "PAYRECON_CONFIG",
        default_value = "./payrecon.toml"
    )]
    config: PathBuf,

    /// Override `backend.owner_id`
    #[arg(long, global = true, env = "PAYRECON_OWNER_ID")]
    owner_id: Option<i64>,

    /// Override `webhook_test.terminal_password`
    #[arg(long, global = true, env = "PAYRECON_TERMINAL_PASSWORD", hide_env_values = true)]
    terminal_password: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.log_json);

    let loader = ConfigLoader::new(
        &args.config,
        Overrides {
            owner_id: args.owner_id,
            terminal_password: args.terminal_password,
        },
    );

    match args.command {
        Command::Sign(a) => webhook_test::sign(loader.load_optional()?.as_ref(), a),
        Command::Verify(a) => webhook_test::verify(loader.load_optional()?.as_ref(), a),
        Command::SendTestWebhook(a) => {
            webhook_test::send(loader.load_optional()?.as_ref(), a).await
        }
        Command::Payments(a) => payments::run(&connect(&loader)?, a).await,
        Command::Integrations(c) => integrations::run(&connect(&loader)?, c).await,
        Command::Receipts(a) => receipts::list(&connect(&loader)?, a).await,
        Command::FetchOfd(a) => receipts::fetch_ofd(&connect(&loader)?, a).await,
        Command::WebhookLogs(a) => webhook_logs::run(&connect(&loader)?, a).await,
    }
}

/// Load the configuration and build the backend client.
fn connect(loader: &ConfigLoader) -> anyhow::Result<AppState> {
    let loaded_config = loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::debug!("Configuration loaded from {:?}", loader.path());
    Ok(AppState::new(loaded_config))
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr so that command output on stdout stays parseable.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

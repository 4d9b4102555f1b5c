//! Document Index Main Entry Point
//!
//! Runs one command against the configured index and prints the result as JSON
//! on stdout. Logs go to stderr.

use clap::Parser;
use dotenv::dotenv;
use document_index::{commands, AppError, Cli, Dependencies, Settings};
use std::env;
use std::io;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("document_index=info,document_index_repository=info"));

    let json_logs = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(io::stderr)
                    .pretty(),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    let cli = Cli::parse();

    let settings = Settings::from_env();
    let deps = match Dependencies::new(&settings).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    match commands::run(cli.command, &deps.service).await {
        Ok(output) => {
            let text = serde_json::to_string_pretty(&output)?;
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            Err(e)
        }
    }
}

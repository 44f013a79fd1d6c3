//! # Plugin Matrix
//!
//! The GitHub Actions step that prepares a plugin's CI matrix.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                apps/plugin-matrix (THE BINARY)            │
//! │                                                           │
//! │  ┌─────────────┐    ┌──────────────┐    ┌─────────────┐   │
//! │  │   CLI       │    │ Input Loader │    │   Output    │   │
//! │  │  (clap)     │    │ (yaml, http) │    │   Emitter   │   │
//! │  └──────┬──────┘    └──────┬───────┘    └──────┬──────┘   │
//! │         │                  │                   │          │
//! │         └──────────────────┼───────────────────┘          │
//! │                            ▼                              │
//! │                    ┌───────────────┐                      │
//! │                    │  matrix-core  │                      │
//! │                    │  (THE LOGIC)  │                      │
//! │                    └───────────────┘                      │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Inside a workflow step (reads GITHUB_WORKSPACE / GITHUB_OUTPUT)
//! plugin-matrix run
//!
//! # Locally, against a saved release feed
//! plugin-matrix -w ./checkout --feed-file updates.json explain
//! ```

use clap::Parser;
use plugin_matrix::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing - PLUGIN_MATRIX_LOG_FORMAT=json enables machine-parseable output.
    let log_format =
        std::env::var("PLUGIN_MATRIX_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "plugin_matrix=debug"
    } else {
        "plugin_matrix=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr; stdout carries the output notices.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet {
        println!("plugin-matrix v{}", env!("CARGO_PKG_VERSION"));
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

//! # Surveyscope - Survey Results Dashboard
//!
//! The main binary for Surveyscope.
//!
//! This application provides:
//! - CLI interface for classifying, analyzing and reporting on survey uploads
//! - HTTP dashboard API (axum-based)
//! - Google Docs publishing
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  apps/surveyscope (THE BINARY)                  │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐    │
//! │  │   CLI       │    │   HTTP API  │    │   Docs client    │    │
//! │  │  (clap)     │    │   (axum)    │    │   (reqwest)      │    │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘    │
//! │         │                  │                    │               │
//! │         └──────────────────┼────────────────────┘               │
//! │                            ▼                                    │
//! │                  ┌───────────────────┐                          │
//! │                  │ surveyscope-core  │                          │
//! │                  │   (THE LOGIC)     │                          │
//! │                  └───────────────────┘                          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the dashboard API
//! surveyscope serve --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! surveyscope classify uploads/*.xlsx
//! surveyscope team --team build_team --section comments uploads/*.xlsx
//! surveyscope report --company -o company.txt uploads/*.xlsx
//! ```

use clap::Parser;
use surveyscope::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // SURVEYSCOPE_LOG_FORMAT=json enables machine-parseable output.
    let log_format =
        std::env::var("SURVEYSCOPE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "surveyscope=info,surveyscope_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  Surveyscope v{}
  Survey results, per team and company-wide
"#,
        env!("CARGO_PKG_VERSION")
    );
}

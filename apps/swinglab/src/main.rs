//! # swinglab - Golf Swing Assessment
//!
//! The main binary for the swinglab analysis pipeline.
//!
//! This application provides:
//! - CLI interface for single and batch analysis
//! - Capture and configuration file loading
//! - Parallel batch execution on the tokio blocking pool
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                apps/swinglab (THE BINARY)             │
//! │                                                       │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐  │
//! │  │    CLI      │   │  Captures   │   │   Config    │  │
//! │  │   (clap)    │   │   (JSON)    │   │   (TOML)    │  │
//! │  └──────┬──────┘   └──────┬──────┘   └──────┬──────┘  │
//! │         └─────────────────┼─────────────────┘         │
//! │                           ▼                           │
//! │                  ┌─────────────────┐                  │
//! │                  │  swinglab-core  │                  │
//! │                  │   (THE LOGIC)   │                  │
//! │                  └─────────────────┘                  │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! swinglab analyze -f swing.json
//! swinglab --json-mode batch -f a.json -f b.json --parallel
//! swinglab --config swinglab.toml rules
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // SWINGLAB_LOG_FORMAT=json enables machine-parseable logs. Logs go to
    // stderr so they never interleave with JSON results on stdout.
    let log_format = std::env::var("SWINGLAB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "swinglab=info,swinglab_core=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = swinglab::cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = swinglab::cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the swinglab startup banner.
fn print_banner() {
    println!(
        r#"
  swinglab v{}

  Phases • Metrics • Scores • Coaching
"#,
        env!("CARGO_PKG_VERSION")
    );
}

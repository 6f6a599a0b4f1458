//! # Quest
//!
//! The main binary for the onboarding quest.
//!
//! This application provides:
//! - CLI commands, one per user action
//! - A local HTTP API for a browser front-end
//! - Terminal confetti for celebrations
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   apps/quest (THE BINARY)               │
//! │                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌────────────┐   │
//! │  │    CLI      │    │  HTTP API   │    │   Config   │   │
//! │  │   (clap)    │    │   (axum)    │    │   (toml)   │   │
//! │  └──────┬──────┘    └──────┬──────┘    └─────┬──────┘   │
//! │         └──────────────────┼─────────────────┘          │
//! │                            ▼                            │
//! │                    ┌───────────────┐                    │
//! │                    │  quest-core   │                    │
//! │                    │  (THE LOGIC)  │                    │
//! │                    └───────────────┘                    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! quest status
//! quest open 1
//! quest complete 1
//! quest email user@example.com
//! quest celebrate --animate
//! quest serve --port 8080
//! ```

use clap::Parser;
use quest::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing. QUEST_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("QUEST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "quest=debug,quest_core=debug,tower_http=debug"
    } else {
        "quest=info,quest_core=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

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
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
   ___                 _
  / _ \ _   _  ___ ___| |_
 | | | | | | |/ _ / __| __|
 | |_| | |_| |  __\__ \ |_
  \__\_\\__,_|\___|___/\__|

  Onboarding Quest v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}

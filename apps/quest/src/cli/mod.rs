//! # Quest CLI Module
//!
//! This module implements the CLI interface for the quest. Each subcommand is
//! one user action, mapped to one tracker call.
//!
//! ## Available Commands
//!
//! - `status` - Show progress
//! - `map` - Show the journey map
//! - `start` - Leave the welcome screen
//! - `video` - Acknowledge the introductory video
//! - `open` - Open a stage screen
//! - `complete` - Complete a stage
//! - `email` - Submit the final-stage email
//! - `sound` - Toggle sound effects
//! - `reset` - Clear all progress
//! - `celebrate` - Play the confetti animation
//! - `export` - Back up progress to a file
//! - `import` - Restore progress from a backup
//! - `serve` - Start the HTTP server

mod commands;
pub mod terminal;

use crate::config::{BackendKind, QuestConfig};
use clap::{Parser, Subcommand};
use quest_core::QuestError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Onboarding quest
///
/// Nine stages, one acknowledgment each. Progress is saved after every step.
#[derive(Parser, Debug)]
#[command(name = "quest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print every event a command emits
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file [default: ./quest.toml if present]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the progress database (overrides storage.path)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend (overrides storage.backend)
    #[arg(short = 'B', long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show progress
    Status,

    /// Show the journey map
    Map,

    /// Leave the welcome screen for the introductory video
    Start,

    /// Mark the introductory video as watched
    Video,

    /// Open a stage screen (locked stages are refused)
    Open {
        /// Stage number (1-9)
        stage: u8,
    },

    /// Complete a stage
    Complete {
        /// Stage number (1-9)
        stage: u8,
    },

    /// Submit your email and complete the final stage
    Email {
        /// Email address
        address: String,
    },

    /// Toggle sound effects on or off
    Sound,

    /// Clear all progress (the sound preference is kept)
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Play the confetti animation
    Celebrate {
        /// Viewport width in pixels (overrides celebration.width)
        #[arg(long)]
        width: Option<u32>,

        /// Viewport height in pixels (overrides celebration.height)
        #[arg(long)]
        height: Option<u32>,

        /// Animate in the terminal instead of rendering headless
        #[arg(short, long)]
        animate: bool,
    },

    /// Back up progress to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (snapshot, json)
        #[arg(short = 't', long, default_value = "snapshot")]
        format: String,
    },

    /// Restore progress from a snapshot or JSON backup
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Load configuration and apply the global flag overrides.
pub fn resolve_config(cli: &Cli) -> Result<QuestConfig, QuestError> {
    let mut config = QuestConfig::load(cli.config.as_deref())?;

    if let Some(database) = &cli.database {
        config.storage.path = database.clone();
    }
    if let Some(backend) = cli.backend {
        config.storage.backend = backend;
    }

    Ok(config)
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), QuestError> {
    let mut config = resolve_config(&cli)?;
    let out = Output {
        json_mode: cli.json_mode,
        verbose: cli.verbose,
    };

    match cli.command {
        Some(Commands::Status) | None => cmd_status(&config, out),
        Some(Commands::Map) => cmd_map(&config, out),
        Some(Commands::Start) => cmd_start(&config, out).await,
        Some(Commands::Video) => cmd_video(&config, out).await,
        Some(Commands::Open { stage }) => cmd_open(&config, out, stage).await,
        Some(Commands::Complete { stage }) => cmd_complete(&config, out, stage).await,
        Some(Commands::Email { address }) => cmd_email(&config, out, &address).await,
        Some(Commands::Sound) => cmd_sound(&config, out).await,
        Some(Commands::Reset { yes }) => cmd_reset(&config, out, yes),
        Some(Commands::Celebrate {
            width,
            height,
            animate,
        }) => {
            if let Some(width) = width {
                config.celebration.width = width;
            }
            if let Some(height) = height {
                config.celebration.height = height;
            }
            config.validate()?;
            cmd_celebrate(&config, out, animate).await
        }
        Some(Commands::Export { output, format }) => cmd_export(&config, &output, &format),
        Some(Commands::Import { input }) => cmd_import(&config, out, &input),
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_serve(&config).await
        }
    }
}

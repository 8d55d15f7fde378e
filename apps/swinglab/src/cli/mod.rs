//! # swinglab CLI Module
//!
//! This module implements the CLI interface for swinglab.
//!
//! ## Available Commands
//!
//! - `analyze` - Assess one pose capture
//! - `batch` - Assess several captures, one result slot per file
//! - `rules` - Show the scoring rule table and attached models

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swinglab_core::SwingError;

pub use commands::*;

use crate::config::AppConfig;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// swinglab - golf swing assessment
///
/// Reads pose landmark captures and reports swing phases, kinematic metrics,
/// category scores and coaching recommendations.
#[derive(Parser, Debug)]
#[command(name = "swinglab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one capture file
    Analyze {
        /// Path to the capture (JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Analyze several capture files
    Batch {
        /// Capture files, in result order
        #[arg(short, long = "file", required = true)]
        files: Vec<PathBuf>,

        /// Analyze files concurrently on the blocking pool
        #[arg(short, long)]
        parallel: bool,
    },

    /// Show the scoring rule table and model attachments
    Rules,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), SwingError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let analyzer = config.build_analyzer()?;
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Analyze { file } => cmd_analyze(&analyzer, json_mode, &file),
        Commands::Batch { files, parallel } => {
            cmd_batch(analyzer, json_mode, files, parallel).await
        }
        Commands::Rules => cmd_rules(&analyzer, json_mode),
    }
}

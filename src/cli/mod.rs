//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for ShiftSync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// ShiftSync - Schedule import orchestration
#[derive(Parser, Debug)]
#[command(name = "shiftsync")]
#[command(version, about, long_about = None)]
#[command(author = "ShiftSync Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "shiftsync.toml", env = "SHIFTSYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SHIFTSYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Check that the configured database accepts phase transactions
    CheckDb(commands::check_db::CheckDbArgs),
}

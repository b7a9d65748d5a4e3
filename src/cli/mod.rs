//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod commands;
pub mod output;

/// skillmap - track learner progress through skill maps
#[derive(Parser, Debug)]
#[command(name = "skillmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable machine-readable JSON output
    #[arg(long, short = 'm', global = true, alias = "machine")]
    pub robot: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/skillmap/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Page source url progress is recorded under
    #[arg(long, global = true)]
    pub source: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show completion state for every loaded map
    Status(commands::status::StatusArgs),

    /// Upgrade a saved learner record to the current schema
    Migrate(commands::migrate::MigrateArgs),

    /// Finish an activity and record the result
    Complete(commands::complete::CompleteArgs),

    /// Clear progress recorded under the active page source
    Reset(commands::reset::ResetArgs),
}

/// Files a command reads progress from.
#[derive(Args, Debug, Clone, Default)]
pub struct ProgressFiles {
    /// Skill map document (JSON)
    #[arg(long)]
    pub maps: Option<PathBuf>,

    /// Learner record (default: storage.user_path)
    #[arg(long)]
    pub user: Option<PathBuf>,
}

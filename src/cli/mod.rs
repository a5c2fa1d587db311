//! CLI module - Command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod add;
pub mod config;
pub mod display;
pub mod export;
pub mod show;
pub mod utils;

/// g5 - G5 spaced repetition schedule generator
///
/// Learn a new set every day, review it after 1, 3, 7 and 14 days.
#[derive(Parser, Debug)]
#[command(name = "g5")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(long, global = true, env = "G5_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add new sets to the schedule and print it
    Add(add::AddArgs),

    /// Print the saved schedule
    Show(show::ShowArgs),

    /// Export the saved schedule to an iCalendar file
    Export(export::ExportArgs),

    /// Get or set configuration
    Config(config::ConfigArgs),
}

//! `g5 show` command
//!
//! Prints the saved schedule without changing it.
//!
//! # Usage
//! ```bash
//! g5 show                 # daily table
//! g5 show --rows          # one line per event
//! g5 show --json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::display;
use super::utils::load_schedule;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Schedule file (default: g5_schedule.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// One line per event instead of one line per day
    #[arg(long)]
    pub rows: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ShowArgs, config: &Config) -> Result<()> {
    let path = config.schedule_path(args.output.as_deref());
    let schedule = load_schedule(&path)?;

    if args.json {
        println!("{}", display::rows_json(&schedule)?);
        return Ok(());
    }

    if schedule.is_empty() {
        println!("No sets scheduled in {}", path.display());
        println!("\nAdd some with:");
        println!("  g5 add -n 5");
        return Ok(());
    }

    println!("G5 Schedule ({}, {} sets):", path.display(), schedule.len());
    if args.rows {
        println!("{}", display::rows_table(&schedule));
    } else {
        println!("{}", display::agenda_table(&schedule));
    }

    Ok(())
}

//! `g5 export` command
//!
//! Writes the saved schedule to an iCalendar file.
//!
//! # Usage
//! ```bash
//! g5 export -c my_schedule           # -> my_schedule.ics
//! g5 export -c cal.ics -o other.json
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use super::utils::load_schedule;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Calendar file to write (.ics added if missing)
    #[arg(short, long)]
    pub calendar: PathBuf,

    /// Schedule file (default: g5_schedule.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Plain titles without emoji
    #[arg(long)]
    pub no_emoji: bool,
}

pub fn run(args: ExportArgs, config: &Config) -> Result<()> {
    let path = config.schedule_path(args.output.as_deref());
    let schedule = load_schedule(&path)?;

    if schedule.is_empty() {
        bail!(
            "Schedule {} has no sets. Run 'g5 add' first.",
            path.display()
        );
    }

    let mut options = config.calendar.clone();
    if args.no_emoji {
        options.emoji = false;
    }

    let cal_path = config.calendar_path(&args.calendar);
    schedule
        .export_calendar_with(&cal_path, &options)
        .with_context(|| format!("Failed to export calendar to {}", cal_path.display()))?;

    println!(
        "{} Exported {} events to {}",
        "✅".green(),
        schedule.to_rows().len(),
        cal_path.display()
    );

    Ok(())
}

//! `g5 add` command
//!
//! Adds new sets to the schedule, saves it and prints the daily table.
//!
//! # Usage
//! ```bash
//! g5 add -n 5                          # 5 sets from today, starting at set 1
//! g5 add -n 3 -d 07-04-2025 -s 6       # sets 6..8 from 7 April 2025
//! g5 add -n 3 -c my_schedule           # also write my_schedule.ics
//! g5 add -n 2 -s 4 --no-overwrite      # fail if set 4 or 5 already exists
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::display;
use super::utils::{load_schedule, start_date};
use crate::config::Config;
use crate::core::date::format_input;
use crate::core::schedule::MergePolicy;
use crate::core::error::ScheduleError;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Number of new sets to add
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub num_sets: i64,

    /// Start date in DD-MM-YYYY format (default: today)
    #[arg(short = 'd', long)]
    pub start_date: Option<String>,

    /// Set number that corresponds to the start date (default: 1)
    #[arg(short = 's', long, allow_negative_numbers = true)]
    pub set_number: Option<i64>,

    /// Schedule file (default: g5_schedule.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also export to an iCalendar file (.ics added if missing)
    #[arg(short, long)]
    pub calendar: Option<PathBuf>,

    /// Fail instead of replacing sets whose numbers already exist
    #[arg(long)]
    pub no_overwrite: bool,

    /// Print rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: AddArgs, config: &Config) -> Result<()> {
    // 1. Resolve inputs
    let start = start_date(args.start_date.as_deref())?;
    let first = args
        .set_number
        .unwrap_or(config.schedule.first_set_number);
    let path = config.schedule_path(args.output.as_deref());

    // 2. Load and merge
    let mut schedule = load_schedule(&path)?;
    schedule.set_policy(if args.no_overwrite {
        MergePolicy::Reject
    } else {
        config.schedule.on_conflict
    });
    schedule
        .add_new_sets(first, start, args.num_sets)
        .map_err(|e| match e {
            ScheduleError::Conflict { .. } => anyhow::Error::new(e).context(
                "Refusing to replace an existing set: pass a --set-number past the last \
                 saved set, or drop --no-overwrite and set schedule.on_conflict = \"overwrite\"",
            ),
            other => other.into(),
        })?;

    // 3. Stage every output before replacing any of them
    let cal_path = args.calendar.as_ref().map(|c| config.calendar_path(c));
    let staged_schedule = schedule
        .stage_save(&path)
        .with_context(|| format!("Failed to save schedule to {}", path.display()))?;
    let staged_calendar = cal_path
        .as_ref()
        .map(|cal| {
            schedule
                .stage_calendar(cal, &config.calendar)
                .with_context(|| format!("Failed to export calendar to {}", cal.display()))
        })
        .transpose()?;

    // 4. Persist
    staged_schedule
        .commit()
        .with_context(|| format!("Failed to save schedule to {}", path.display()))?;

    if let Some(staged) = staged_calendar {
        let target = staged.target().to_path_buf();
        staged
            .commit()
            .with_context(|| format!("Failed to export calendar to {}", target.display()))?;
    }

    // 5. Display
    if args.json {
        println!("{}", display::rows_json(&schedule)?);
        return Ok(());
    }

    println!(
        "\n{}",
        format!("G5 Schedule (saved to {}):", path.display()).bold()
    );
    println!("Starting with Set {:02} on {}", first, format_input(start));
    println!("{}", display::agenda_table(&schedule));

    if let Some(cal_path) = &cal_path {
        println!(
            "\n{} Schedule exported to iCalendar: {}",
            "✅".green(),
            cal_path.display()
        );
        println!("You can import this file into Google Calendar:");
        println!("1. Go to Google Calendar website");
        println!("2. Click the '+' button next to 'Other calendars'");
        println!("3. Select 'Import'");
        println!("4. Upload the .ics file");
    }

    Ok(())
}

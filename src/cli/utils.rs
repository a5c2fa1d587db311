//! CLI utility functions
//!
//! Helpers shared by the schedule commands.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::core::date::parse_date;
use crate::core::schedule::Schedule;

/// Load the schedule at `path`, empty if the file does not exist yet.
pub fn load_schedule(path: &Path) -> Result<Schedule> {
    Schedule::load(path).with_context(|| format!("Cannot use schedule {}", path.display()))
}

/// Parse `--start-date`, defaulting to today's local date.
pub fn start_date(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

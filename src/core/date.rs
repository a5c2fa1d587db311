//! Date parsing for user-supplied start dates

use chrono::NaiveDate;

use super::error::{Result, ScheduleError};

/// Primary input format (`DD-MM-YYYY`)
pub const INPUT_FORMAT: &str = "%d-%m-%Y";

/// Storage format (`YYYY-MM-DD`)
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Parse a start date given as `DD-MM-YYYY` or `YYYY-MM-DD`.
///
/// # Errors
/// Returns [`ScheduleError::Validation`] if the string matches neither format.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, INPUT_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_FORMAT))
        .map_err(|_| {
            ScheduleError::validation(format!(
                "malformed date '{}': expected DD-MM-YYYY",
                input
            ))
        })
}

/// Format a date the way the CLI accepts it back.
pub fn format_input(date: NaiveDate) -> String {
    date.format(INPUT_FORMAT).to_string()
}

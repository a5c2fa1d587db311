//! g5 - G5 spaced repetition schedule generator
//!
//! Plans learning sets with the G5 method: every set is learned on day 0 and
//! reviewed on days 1, 3, 7 and 14 after that.
//!
//! ## Key Concepts
//!
//! - **Set**: numbered batch of material with derived review dates
//! - **Schedule**: all sets, persisted as one JSON file, rewritten each run
//! - **Rows**: flat `(date, set, event)` view ordered by date then set number
//! - **Export**: the same rows as all-day iCalendar events

pub mod cli;
pub mod config;
pub mod core;

pub use self::core::calendar::CalendarOptions;
pub use self::core::error::{Result, ScheduleError};
pub use self::core::rows::ScheduleRow;
pub use self::core::schedule::{MergePolicy, Schedule};
pub use self::core::set::{EventKind, Set};

//! Schedule - the set of all learning sets and their merge rules
//!
//! # Invariants
//! - Set numbers are unique (the map key is the number)
//! - For numbers `i < j`, set `j` is never introduced before set `i`
//! - `add_new_sets` is all-or-nothing: on error the schedule is untouched
//!
//! # Lifecycle
//! ```text
//! load(path) -> add_new_sets(..) -> save(path) -> to_rows() / export_calendar(..)
//! ```

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::Path;

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::agenda::{self, DayAgenda};
use super::calendar::{self, CalendarOptions};
use super::error::{Result, ScheduleError};
use super::rows::Rows;
use super::set::Set;
use super::storage::{self, StagedWrite};

/// What `add_new_sets` does when a new set number is already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Replace the existing set (last write wins)
    #[default]
    Overwrite,
    /// Fail with [`ScheduleError::Conflict`]
    Reject,
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergePolicy::Reject => write!(f, "reject"),
            MergePolicy::Overwrite => write!(f, "overwrite"),
        }
    }
}

impl std::str::FromStr for MergePolicy {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(MergePolicy::Reject),
            "overwrite" => Ok(MergePolicy::Overwrite),
            _ => Err(ScheduleError::validation(format!(
                "unknown merge policy: {}",
                s
            ))),
        }
    }
}

/// A G5 review schedule
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    sets: BTreeMap<u32, Set>,
    policy: MergePolicy,
}

impl PartialEq for Schedule {
    fn eq(&self, other: &Self) -> bool {
        self.sets == other.sets
    }
}

impl Schedule {
    /// Create an empty schedule with the default (overwriting) merge policy
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: MergePolicy) {
        self.policy = policy;
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn get(&self, number: u32) -> Option<&Set> {
        self.sets.get(&number)
    }

    /// Sets in ascending number order
    pub fn sets(&self) -> impl Iterator<Item = &Set> {
        self.sets.values()
    }

    pub fn first_set(&self) -> Option<&Set> {
        self.sets.values().next()
    }

    pub fn last_set(&self) -> Option<&Set> {
        self.sets.values().next_back()
    }

    /// Number following the highest existing set (1 when empty)
    pub fn next_set_number(&self) -> u32 {
        self.last_set()
            .map(|s| s.number().saturating_add(1))
            .unwrap_or(1)
    }

    /// Date following the latest introduction date, if any
    pub fn next_start_date(&self) -> Option<NaiveDate> {
        self.last_set()
            .and_then(|s| s.introduced_on().checked_add_days(Days::new(1)))
    }

    /// Append `count` sets numbered from `first_set_number`, one day apart
    /// starting at `start_date`.
    ///
    /// Returns the range of set numbers written.
    ///
    /// # Errors
    /// - [`ScheduleError::Validation`] if `count < 1`, `first_set_number < 1`,
    ///   the numbers or dates overflow, or the result would introduce a set
    ///   before a lower-numbered one
    /// - [`ScheduleError::Conflict`] if a number is taken and the policy is
    ///   [`MergePolicy::Reject`]
    pub fn add_new_sets(
        &mut self,
        first_set_number: i64,
        start_date: NaiveDate,
        count: i64,
    ) -> Result<RangeInclusive<u32>> {
        if count < 1 {
            return Err(ScheduleError::validation("count must be positive"));
        }
        if first_set_number < 1 {
            return Err(ScheduleError::validation("set number must be positive"));
        }

        let first = u32::try_from(first_set_number)
            .map_err(|_| ScheduleError::validation("set number too large"))?;
        let last = first_set_number
            .checked_add(count - 1)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ScheduleError::validation("set numbers exceed the supported range"))?;

        if self.policy == MergePolicy::Reject {
            if let Some((&taken, _)) = self.sets.range(first..=last).next() {
                return Err(ScheduleError::Conflict { number: taken });
            }
        }

        let mut merged = self.sets.clone();
        for (i, number) in (first..=last).enumerate() {
            let introduced_on = start_date
                .checked_add_days(Days::new(i as u64))
                .ok_or_else(|| {
                    ScheduleError::validation(format!(
                        "introduction date for set {} out of range",
                        number
                    ))
                })?;
            let set = Set::new(number, introduced_on)?;
            if merged.insert(number, set).is_some() {
                warn!(set = number, "overwriting existing set");
            }
        }

        storage::check_chronology(&merged).map_err(ScheduleError::Validation)?;

        self.sets = merged;
        info!(first, last, %start_date, total = self.sets.len(), "added sets");
        Ok(first..=last)
    }

    /// Load a schedule file; a missing file yields an empty schedule.
    ///
    /// # Errors
    /// - [`ScheduleError::Deserialization`] if the file exists but is invalid
    /// - [`ScheduleError::Io`] if the file cannot be read
    pub fn load(path: &Path) -> Result<Self> {
        match storage::read(path)? {
            Some(sets) => {
                debug!(path = %path.display(), sets = sets.len(), "loaded schedule");
                Ok(Self {
                    sets,
                    policy: MergePolicy::default(),
                })
            }
            None => {
                debug!(path = %path.display(), "no schedule file, starting empty");
                Ok(Self::new())
            }
        }
    }

    /// Overwrite `path` with the full schedule.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.stage_save(path)?.commit()?;
        info!(path = %path.display(), sets = self.sets.len(), "saved schedule");
        Ok(())
    }

    /// Serialize the schedule next to `path`; nothing replaces `path` until
    /// the returned write is committed.
    pub fn stage_save(&self, path: &Path) -> Result<StagedWrite> {
        storage::stage_sets(path, &self.sets)
    }

    /// Date-ordered rows (ties broken by set number). Restartable and
    /// side-effect free.
    pub fn to_rows(&self) -> Rows<'_> {
        Rows::new(&self.sets)
    }

    /// Date numbered `D1`: the theoretical introduction day of set 1
    pub fn day_one(&self) -> Option<NaiveDate> {
        let first = self.first_set()?;
        let back = u64::from(first.number() - 1);
        first
            .introduced_on()
            .checked_sub_days(Days::new(back))
            .or(Some(NaiveDate::MIN))
    }

    /// Rows grouped by date for tabular display
    pub fn daily_agenda(&self) -> Vec<DayAgenda> {
        match self.day_one() {
            Some(anchor) => agenda::group_by_day(self.to_rows(), anchor),
            None => Vec::new(),
        }
    }

    /// Render the calendar without touching the filesystem
    pub fn to_ics(&self, options: &CalendarOptions) -> String {
        calendar::render(self.to_rows(), options, Utc::now())
    }

    /// Write one all-day event per row to `path` with default options.
    pub fn export_calendar(&self, path: &Path) -> Result<()> {
        self.export_calendar_with(path, &CalendarOptions::default())
    }

    pub fn export_calendar_with(&self, path: &Path, options: &CalendarOptions) -> Result<()> {
        self.stage_calendar(path, options)?.commit()?;
        info!(path = %path.display(), events = self.to_rows().len(), "exported calendar");
        Ok(())
    }

    /// Render the calendar next to `path` without replacing it yet.
    pub fn stage_calendar(&self, path: &Path, options: &CalendarOptions) -> Result<StagedWrite> {
        storage::stage(path, self.to_ics(options).as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rows::ScheduleRow;
    use crate::core::set::{EventKind, ReviewRound};
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_five_sets() {
        let mut schedule = Schedule::new();
        let added = schedule.add_new_sets(1, date(2023, 1, 1), 5).unwrap();

        assert_eq!(added, 1..=5);
        let numbers: Vec<u32> = schedule.sets().map(|s| s.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        for (i, set) in schedule.sets().enumerate() {
            assert_eq!(set.introduced_on(), date(2023, 1, 1 + i as u32));
        }
    }

    #[test]
    fn test_non_positive_count_rejected() {
        let mut schedule = Schedule::new();
        schedule.add_new_sets(1, date(2023, 1, 1), 2).unwrap();
        let before = schedule.clone();

        for count in [0, -1] {
            let err = schedule.add_new_sets(3, date(2023, 1, 3), count).unwrap_err();
            assert!(err.to_string().contains("count must be positive"));
            assert_eq!(schedule, before);
        }
    }

    #[test]
    fn test_zero_first_number_rejected() {
        let mut schedule = Schedule::new();
        let err = schedule.add_new_sets(0, date(2023, 1, 1), 3).unwrap_err();
        assert!(err.is_validation());
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_append_after_existing() {
        let mut schedule = Schedule::new();
        schedule.add_new_sets(1, date(2023, 1, 1), 3).unwrap();
        schedule.add_new_sets(4, date(2023, 1, 4), 2).unwrap();

        assert_eq!(schedule.len(), 5);
        assert_eq!(schedule.next_set_number(), 6);
        assert_eq!(schedule.next_start_date(), Some(date(2023, 1, 6)));
    }

    #[test]
    fn test_conflict_overwrites_by_default() {
        let mut schedule = Schedule::new();
        assert_eq!(schedule.policy(), MergePolicy::Overwrite);
        schedule.add_new_sets(1, date(2023, 1, 1), 3).unwrap();
        schedule.add_new_sets(3, date(2023, 1, 3), 2).unwrap();

        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule.get(4).unwrap().introduced_on(), date(2023, 1, 4));
    }

    #[test]
    fn test_rerun_from_set_one_replaces() {
        let mut schedule = Schedule::new();
        schedule.add_new_sets(1, date(2023, 1, 1), 3).unwrap();
        schedule.add_new_sets(1, date(2023, 2, 1), 3).unwrap();

        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule.get(1).unwrap().introduced_on(), date(2023, 2, 1));
    }

    #[test]
    fn test_conflict_reject_policy() {
        let mut schedule = Schedule::new().with_policy(MergePolicy::Reject);
        schedule.add_new_sets(1, date(2023, 1, 1), 3).unwrap();
        let before = schedule.clone();

        let err = schedule.add_new_sets(3, date(2023, 1, 3), 2).unwrap_err();
        assert!(matches!(err, ScheduleError::Conflict { number: 3 }));
        assert_eq!(schedule, before);
    }

    #[test]
    fn test_conflict_overwrite_replaces_dates() {
        let mut schedule = Schedule::new();
        schedule.add_new_sets(1, date(2023, 1, 1), 3).unwrap();
        schedule.add_new_sets(3, date(2023, 1, 10), 2).unwrap();

        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule.get(3).unwrap().introduced_on(), date(2023, 1, 10));
        assert_eq!(schedule.get(4).unwrap().introduced_on(), date(2023, 1, 11));
    }

    #[test]
    fn test_out_of_order_append_rejected() {
        let mut schedule = Schedule::new();
        schedule.add_new_sets(1, date(2023, 1, 10), 2).unwrap();
        let before = schedule.clone();

        let err = schedule.add_new_sets(3, date(2023, 1, 5), 1).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(schedule, before);
    }

    #[test]
    fn test_overwrite_cannot_break_order() {
        let mut schedule = Schedule::new().with_policy(MergePolicy::Overwrite);
        schedule.add_new_sets(1, date(2023, 1, 1), 5).unwrap();

        // Set 2 moved past set 3
        let err = schedule.add_new_sets(2, date(2023, 2, 1), 1).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(schedule.get(2).unwrap().introduced_on(), date(2023, 1, 2));
    }

    #[test]
    fn test_number_overflow_rejected() {
        let mut schedule = Schedule::new();
        let err = schedule
            .add_new_sets(i64::from(u32::MAX), date(2023, 1, 1), 2)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_rows_sorted_and_restartable() {
        let mut schedule = Schedule::new();
        schedule.add_new_sets(1, date(2023, 1, 1), 4).unwrap();

        let first: Vec<ScheduleRow> = schedule.to_rows().collect();
        let second: Vec<ScheduleRow> = schedule.to_rows().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 20);
        assert!(first
            .windows(2)
            .all(|w| (w[0].date, w[0].set_number) <= (w[1].date, w[1].set_number)));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("g5_schedule.json");

        let mut schedule = Schedule::new();
        schedule.add_new_sets(1, date(2023, 1, 1), 3).unwrap();
        schedule.add_new_sets(7, date(2023, 1, 9), 2).unwrap();
        schedule.save(&path).unwrap();

        let loaded = Schedule::load(&path).unwrap();
        assert_eq!(loaded, schedule);
        assert!(loaded.to_rows().eq(schedule.to_rows()));
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempdir().unwrap();
        let schedule = Schedule::load(&dir.path().join("missing.json")).unwrap();
        assert!(schedule.is_empty());
        assert_eq!(schedule.to_rows().count(), 0);
    }

    #[test]
    fn test_load_corrupt_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Schedule::load(&path).unwrap_err();
        assert!(matches!(err, ScheduleError::Deserialization { .. }));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        std::fs::write(&path, "old content that is much longer than nothing").unwrap();

        Schedule::new().save(&path).unwrap();
        let loaded = Schedule::load(&path).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_export_single_set() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("g5.ics");

        let mut schedule = Schedule::new();
        schedule.add_new_sets(1, date(2023, 1, 1), 1).unwrap();
        schedule.export_calendar(&path).unwrap();

        let ics = std::fs::read_to_string(&path).unwrap();
        let starts: Vec<&str> = ics
            .lines()
            .filter_map(|l| l.trim_end().strip_prefix("DTSTART;VALUE=DATE:"))
            .collect();
        assert_eq!(
            starts,
            vec!["20230101", "20230102", "20230104", "20230108", "20230115"]
        );

        let summaries: Vec<&str> = ics
            .lines()
            .filter_map(|l| l.trim_end().strip_prefix("SUMMARY:"))
            .collect();
        assert_eq!(summaries.len(), 5);
        assert!(summaries[0].contains("Learn Set 01"));
        assert!(summaries[1..].iter().all(|s| s.contains("Review Set 01")));
    }

    #[test]
    fn test_export_unwritable_path() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let mut schedule = Schedule::new();
        schedule.add_new_sets(1, date(2023, 1, 1), 1).unwrap();
        let err = schedule
            .export_calendar(&blocker.join("cal.ics"))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Io { .. }));
    }

    #[test]
    fn test_daily_agenda_numbering() {
        let mut schedule = Schedule::new();
        schedule.add_new_sets(3, date(2023, 1, 3), 2).unwrap();
        let days = schedule.daily_agenda();

        assert_eq!(days[0].date, date(2023, 1, 3));
        assert_eq!(days[0].day_number, 3);
        assert_eq!(days[0].learn, vec![3]);
        assert_eq!(days[1].learn, vec![4]);
        assert_eq!(days[1].reviews, vec![(3, ReviewRound::new(1).unwrap())]);
        assert!(Schedule::new().daily_agenda().is_empty());
    }

    #[test]
    fn test_rows_label_learn_and_review() {
        let mut schedule = Schedule::new();
        schedule.add_new_sets(1, date(2023, 1, 1), 1).unwrap();
        let events: Vec<EventKind> = schedule.to_rows().map(|r| r.event).collect();
        assert_eq!(events[0], EventKind::Learn);
        assert!(events[1..].iter().all(|e| !e.is_learn()));
    }

    #[test]
    fn test_merge_policy_parse() {
        assert_eq!("overwrite".parse::<MergePolicy>().unwrap(), MergePolicy::Overwrite);
        assert_eq!("Reject".parse::<MergePolicy>().unwrap(), MergePolicy::Reject);
        assert!("merge".parse::<MergePolicy>().is_err());
    }
}

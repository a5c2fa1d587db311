//! Set - one learning set and its derived G5 review dates
//!
//! A set is introduced (learned) on one day and then reviewed on fixed
//! offsets from that day.
//!
//! # G5 offsets
//! | Offset | Event        |
//! |--------|--------------|
//! | 0      | Learn        |
//! | 1      | Review (R1)  |
//! | 3      | Review (R2)  |
//! | 7      | Review (R3)  |
//! | 14     | Review (R4)  |

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::{Result, ScheduleError};

/// Day offsets of the G5 method, relative to the introduction date
pub const G5_OFFSETS: [u64; 5] = [0, 1, 3, 7, 14];

/// Review round `R1`..`R4`
///
/// Only valid rounds can be constructed, so every round maps to an entry
/// of [`G5_OFFSETS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ReviewRound(u8);

impl ReviewRound {
    /// Number of review rounds after the learning day
    pub const COUNT: u8 = (G5_OFFSETS.len() - 1) as u8;

    /// `None` unless `1 <= round <= COUNT`
    pub fn new(round: u8) -> Option<Self> {
        (1..=Self::COUNT).contains(&round).then_some(Self(round))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ReviewRound {
    type Error = String;

    fn try_from(round: u8) -> std::result::Result<Self, Self::Error> {
        Self::new(round).ok_or_else(|| format!("review round {} out of range", round))
    }
}

impl From<ReviewRound> for u8 {
    fn from(round: ReviewRound) -> Self {
        round.0
    }
}

impl std::fmt::Display for ReviewRound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Kind of event in a set's schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Introduction day (offset 0)
    Learn,
    /// Review round 1..=4
    Review(ReviewRound),
}

impl EventKind {
    /// Review event for `round`, `None` if the round does not exist
    pub fn review(round: u8) -> Option<Self> {
        ReviewRound::new(round).map(EventKind::Review)
    }

    /// Event kind for the n-th entry of [`G5_OFFSETS`]
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < G5_OFFSETS.len());
        if index == 0 {
            EventKind::Learn
        } else {
            EventKind::Review(ReviewRound(index as u8))
        }
    }

    /// Position of this event in [`G5_OFFSETS`]
    pub fn index(&self) -> usize {
        match self {
            EventKind::Learn => 0,
            EventKind::Review(round) => usize::from(round.get()),
        }
    }

    /// Day offset from the introduction date
    pub fn offset(&self) -> u64 {
        G5_OFFSETS[self.index()]
    }

    pub fn is_learn(&self) -> bool {
        matches!(self, EventKind::Learn)
    }

    /// Short label used in the schedule file (`Learn`, `R1`..`R4`)
    pub fn short_label(&self) -> String {
        match self {
            EventKind::Learn => "Learn".to_string(),
            EventKind::Review(round) => round.to_string(),
        }
    }

    /// Parse a short label back into an event kind
    pub fn from_short_label(label: &str) -> Option<Self> {
        if label == "Learn" {
            return Some(EventKind::Learn);
        }
        let round: u8 = label.strip_prefix('R')?.parse().ok()?;
        EventKind::review(round)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Learn => write!(f, "Learn"),
            EventKind::Review(round) => write!(f, "Review ({})", round),
        }
    }
}

/// A learning set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Set {
    number: u32,
    introduced_on: NaiveDate,
    review_dates: [NaiveDate; G5_OFFSETS.len()],
}

impl Set {
    /// Create a set and derive its review dates.
    ///
    /// # Errors
    /// - `number` is zero
    /// - the last review date falls outside the supported calendar range
    pub fn new(number: u32, introduced_on: NaiveDate) -> Result<Self> {
        if number == 0 {
            return Err(ScheduleError::validation("set number must be positive"));
        }

        let mut review_dates = [introduced_on; G5_OFFSETS.len()];
        for (slot, offset) in review_dates.iter_mut().zip(G5_OFFSETS) {
            *slot = introduced_on.checked_add_days(Days::new(offset)).ok_or_else(|| {
                ScheduleError::validation(format!(
                    "review date for set {} out of range ({} + {} days)",
                    number, introduced_on, offset
                ))
            })?;
        }

        Ok(Self {
            number,
            introduced_on,
            review_dates,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn introduced_on(&self) -> NaiveDate {
        self.introduced_on
    }

    /// Display name, e.g. `Set 01`
    pub fn name(&self) -> String {
        set_name(self.number)
    }

    /// All event dates, learning day first
    pub fn review_dates(&self) -> &[NaiveDate] {
        &self.review_dates
    }

    /// Date of a single event
    pub fn date_of(&self, kind: EventKind) -> NaiveDate {
        self.review_dates[kind.index()]
    }

    /// Ordered `(event, date)` pairs
    pub fn events(&self) -> impl Iterator<Item = (EventKind, NaiveDate)> + '_ {
        self.review_dates
            .iter()
            .enumerate()
            .map(|(i, date)| (EventKind::from_index(i), *date))
    }
}

/// Display name for a set number
pub fn set_name(number: u32) -> String {
    format!("Set {:02}", number)
}

//! Daily agenda - rows grouped by date
//!
//! Backs the `Date | New Words | Reviews` table printed by the CLI.

use chrono::NaiveDate;
use serde::Serialize;

use super::rows::ScheduleRow;
use super::set::{set_name, EventKind, ReviewRound};

/// Everything due on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAgenda {
    pub date: NaiveDate,
    /// 1-based day number, `D1` being the introduction day of set 1
    pub day_number: i64,
    /// Sets introduced on this date
    pub learn: Vec<u32>,
    /// `(set number, review round)` pairs due on this date
    pub reviews: Vec<(u32, ReviewRound)>,
}

impl DayAgenda {
    fn new(date: NaiveDate, anchor: NaiveDate) -> Self {
        Self {
            date,
            day_number: (date - anchor).num_days() + 1,
            learn: Vec::new(),
            reviews: Vec::new(),
        }
    }

    /// Date column, e.g. `Apr 07 (D1)`
    pub fn date_label(&self) -> String {
        format!("{} (D{})", self.date.format("%b %d"), self.day_number)
    }

    /// New-words column, `-` when nothing is introduced
    pub fn learn_label(&self) -> String {
        if self.learn.is_empty() {
            "-".to_string()
        } else {
            self.learn
                .iter()
                .map(|n| set_name(*n))
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// Reviews column, e.g. `Set 01 (R2), Set 03 (R1)`
    pub fn reviews_label(&self) -> String {
        if self.reviews.is_empty() {
            "-".to_string()
        } else {
            self.reviews
                .iter()
                .map(|(n, round)| format!("{} ({})", set_name(*n), round))
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// Group date-ordered rows into one agenda per date.
///
/// `anchor` is the date numbered `D1`.
pub fn group_by_day<I>(rows: I, anchor: NaiveDate) -> Vec<DayAgenda>
where
    I: IntoIterator<Item = ScheduleRow>,
{
    let mut days: Vec<DayAgenda> = Vec::new();

    for row in rows {
        let start_new = days.last().map_or(true, |day| day.date != row.date);
        if start_new {
            days.push(DayAgenda::new(row.date, anchor));
        }
        let Some(day) = days.last_mut() else {
            continue;
        };

        match row.event {
            EventKind::Learn => day.learn.push(row.set_number),
            EventKind::Review(round) => day.reviews.push((row.set_number, round)),
        }
    }

    days
}

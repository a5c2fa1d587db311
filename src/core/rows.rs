//! Flat, date-ordered projection of a schedule
//!
//! Each set's events are already sorted by date, so the full view is a
//! k-way merge of the per-set sequences. [`Rows`] performs that merge lazily
//! with a min-heap keyed by `(date, set number, event index)`.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use chrono::NaiveDate;
use serde::Serialize;

use super::set::{set_name, EventKind, Set};

/// One event of one set on one date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ScheduleRow {
    pub date: NaiveDate,
    pub set_number: u32,
    pub event: EventKind,
}

impl ScheduleRow {
    /// Human-readable action, e.g. `Learn Set 01` or `Review Set 01 (R2)`
    pub fn action(&self) -> String {
        match self.event {
            EventKind::Learn => format!("Learn {}", set_name(self.set_number)),
            EventKind::Review(round) => {
                format!("Review {} ({})", set_name(self.set_number), round)
            }
        }
    }

    /// Event label distinguishing learning from review days
    pub fn label(&self) -> String {
        self.event.to_string()
    }
}

/// Lazy iterator over [`ScheduleRow`]s, ordered by date then set number
pub struct Rows<'a> {
    sets: &'a BTreeMap<u32, Set>,
    heap: BinaryHeap<Reverse<(NaiveDate, u32, usize)>>,
}

impl<'a> Rows<'a> {
    pub(crate) fn new(sets: &'a BTreeMap<u32, Set>) -> Self {
        let heap = sets
            .values()
            .map(|set| Reverse((set.introduced_on(), set.number(), 0)))
            .collect();
        Self { sets, heap }
    }
}

impl Iterator for Rows<'_> {
    type Item = ScheduleRow;

    fn next(&mut self) -> Option<Self::Item> {
        let Reverse((date, set_number, index)) = self.heap.pop()?;

        if let Some(set) = self.sets.get(&set_number) {
            if let Some(next_date) = set.review_dates().get(index + 1) {
                self.heap.push(Reverse((*next_date, set_number, index + 1)));
            }
        }

        Some(ScheduleRow {
            date,
            set_number,
            event: EventKind::from_index(index),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining: usize = self
            .heap
            .iter()
            .map(|Reverse((_, number, index))| {
                self.sets
                    .get(number)
                    .map(|set| set.review_dates().len() - index)
                    .unwrap_or(0)
            })
            .sum();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}

//! Storage - JSON schedule file
//!
//! The whole schedule is read into memory on load and written back in full
//! on save. Writes go to a temporary sibling file first and are renamed into
//! place, so a failed run never leaves a half-written file behind. Callers
//! that produce several files stage all of them with [`stage`] before
//! committing any.
//!
//! # Format
//! ```json
//! {
//!   "version": 1,
//!   "sets": {
//!     "1": {
//!       "set": "Set 01",
//!       "number": 1,
//!       "learned_on": "2023-01-01",
//!       "review_days": [{ "label": "Learn", "offset": 0, "date": "2023-01-01" }, ...]
//!     }
//!   },
//!   "full_schedule": [{ "date": "2023-01-01", "action": "Learn Set 01" }, ...]
//! }
//! ```
//!
//! `review_days` and `full_schedule` are derived data. On load the review
//! days are checked against `learned_on` and `full_schedule` is ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{Result, ScheduleError};
use super::rows::Rows;
use super::set::{EventKind, Set};

/// Current schedule file format version
pub const FORMAT_VERSION: u32 = 1;

/// On-disk representation of a schedule
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleFile {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Sets keyed by number (JSON object keys are strings)
    #[serde(default)]
    pub sets: BTreeMap<u32, SetRecord>,

    /// Flat listing for humans and other tools, never read back
    #[serde(default, skip_deserializing)]
    pub full_schedule: Vec<ActivityRecord>,
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetRecord {
    /// Display name, e.g. `Set 01`
    pub set: String,
    pub number: u32,
    pub learned_on: NaiveDate,
    #[serde(default)]
    pub review_days: Vec<ReviewRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub label: String,
    pub offset: u64,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub action: String,
}

impl ScheduleFile {
    /// Build the on-disk form from in-memory sets
    pub fn from_sets(sets: &BTreeMap<u32, Set>) -> Self {
        let records = sets
            .values()
            .map(|set| {
                let review_days = set
                    .events()
                    .map(|(kind, date)| ReviewRecord {
                        label: kind.short_label(),
                        offset: kind.offset(),
                        date,
                    })
                    .collect();
                (
                    set.number(),
                    SetRecord {
                        set: set.name(),
                        number: set.number(),
                        learned_on: set.introduced_on(),
                        review_days,
                    },
                )
            })
            .collect();

        let full_schedule = Rows::new(sets)
            .map(|row| ActivityRecord {
                date: row.date,
                action: row.action(),
            })
            .collect();

        Self {
            version: FORMAT_VERSION,
            sets: records,
            full_schedule,
        }
    }

    /// Rebuild sets, checking every derived field against `learned_on`.
    ///
    /// Returns a human-readable reason on failure.
    pub fn into_sets(self) -> std::result::Result<BTreeMap<u32, Set>, String> {
        if self.version > FORMAT_VERSION {
            return Err(format!("unsupported format version {}", self.version));
        }

        let mut sets = BTreeMap::new();
        for (key, record) in self.sets {
            if key != record.number {
                return Err(format!(
                    "entry '{}' holds set number {}",
                    key, record.number
                ));
            }

            let set = Set::new(record.number, record.learned_on).map_err(|e| e.to_string())?;

            // Older files may omit review_days; when present they must agree.
            if !record.review_days.is_empty() {
                check_review_days(&set, &record.review_days)?;
            }

            sets.insert(key, set);
        }

        check_chronology(&sets)?;
        Ok(sets)
    }
}

fn check_review_days(set: &Set, stored: &[ReviewRecord]) -> std::result::Result<(), String> {
    if stored.len() != set.review_dates().len() {
        return Err(format!(
            "{} lists {} review days, expected {}",
            set.name(),
            stored.len(),
            set.review_dates().len()
        ));
    }

    for ((kind, expected), record) in set.events().zip(stored) {
        let label_ok = EventKind::from_short_label(&record.label) == Some(kind);
        if !label_ok || record.offset != kind.offset() || record.date != expected {
            return Err(format!(
                "{} has inconsistent review day {} on {} (expected {} on {})",
                set.name(),
                record.label,
                record.date,
                kind.short_label(),
                expected
            ));
        }
    }

    Ok(())
}

/// Sets must be introduced in non-decreasing order of their numbers.
pub(crate) fn check_chronology(sets: &BTreeMap<u32, Set>) -> std::result::Result<(), String> {
    let mut previous: Option<&Set> = None;
    for set in sets.values() {
        if let Some(prev) = previous {
            if set.introduced_on() < prev.introduced_on() {
                return Err(format!(
                    "{} is introduced on {}, before {} on {}",
                    set.name(),
                    set.introduced_on(),
                    prev.name(),
                    prev.introduced_on()
                ));
            }
        }
        previous = Some(set);
    }
    Ok(())
}

/// Read a schedule file. `Ok(None)` means the file does not exist.
pub fn read(path: &Path) -> Result<Option<BTreeMap<u32, Set>>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ScheduleError::io(path, e)),
    };

    let file: ScheduleFile =
        serde_json::from_str(&content).map_err(|e| ScheduleError::corrupt(path, e))?;
    let sets = file
        .into_sets()
        .map_err(|reason| ScheduleError::corrupt(path, reason))?;

    Ok(Some(sets))
}

/// Serialize and write a schedule file, replacing any previous content.
pub fn write(path: &Path, sets: &BTreeMap<u32, Set>) -> Result<()> {
    stage_sets(path, sets)?.commit()
}

/// Serialize a schedule into a staged write for `path`.
pub fn stage_sets(path: &Path, sets: &BTreeMap<u32, Set>) -> Result<StagedWrite> {
    let content = serde_json::to_string_pretty(&ScheduleFile::from_sets(sets))?;
    stage(path, content.as_bytes())
}

/// Write `content` to a temporary sibling and rename it over `path`.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    stage(path, content)?.commit()
}

/// A complete temporary file waiting to be renamed over its target.
///
/// Dropping it without calling [`StagedWrite::commit`] removes the temporary
/// file and leaves the target untouched.
#[must_use = "nothing is written to the target until the write is committed"]
#[derive(Debug)]
pub struct StagedWrite {
    tmp: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedWrite {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the temporary file over the target.
    pub fn commit(mut self) -> Result<()> {
        fs::rename(&self.tmp, &self.target).map_err(|e| ScheduleError::io(&self.target, e))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedWrite {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.tmp);
        }
    }
}

/// Write `content` next to `path` without touching `path` itself.
///
/// Missing parent directories are created.
pub fn stage(path: &Path, content: &[u8]) -> Result<StagedWrite> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| ScheduleError::io(parent, e))?;
        }
    }

    let staged = StagedWrite {
        tmp: temp_path(path),
        target: path.to_path_buf(),
        committed: false,
    };
    fs::write(&staged.tmp, content).map_err(|e| ScheduleError::io(&staged.tmp, e))?;
    Ok(staged)
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "schedule".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

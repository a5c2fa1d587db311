//! Schedule engine error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the schedule engine.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Input rejected before any mutation was applied.
    #[error("validation error: {0}")]
    Validation(String),

    /// A set number is already taken and the merge policy forbids overwriting it.
    #[error("set {number} already exists in the schedule")]
    Conflict { number: u32 },

    /// The schedule file exists but its content is not a valid schedule.
    #[error("failed to read schedule from {}: {reason}", path.display())]
    Deserialization { path: PathBuf, reason: String },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing the schedule failed.
    #[error("failed to serialize schedule: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScheduleError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        ScheduleError::Validation(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScheduleError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ScheduleError::Deserialization {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` for errors caused by bad caller input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ScheduleError::Validation(_) | ScheduleError::Conflict { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_names_set_only() {
        let err = ScheduleError::Conflict { number: 3 };
        assert_eq!(err.to_string(), "set 3 already exists in the schedule");
        assert!(!err.to_string().contains("--"));
        assert!(err.is_validation());
    }
}

//! Configuration module
//!
//! Lookup order:
//! 1. `--config <path>` / `G5_CONFIG`
//! 2. Local `.g5/config.toml` (walking up from the current directory)
//! 3. Global config in the platform config dir (e.g. `~/.config/g5/config.toml`)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::calendar::CalendarOptions;
use crate::core::schedule::MergePolicy;

/// Environment variable overriding the schedule file path
pub const SCHEDULE_ENV: &str = "G5_SCHEDULE";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub calendar: CalendarOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Schedule file written on every run
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Set number used when `--set-number` is omitted
    #[serde(default = "default_first_set_number")]
    pub first_set_number: i64,

    /// What to do when new sets reuse existing numbers
    #[serde(default)]
    pub on_conflict: MergePolicy,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            first_set_number: default_first_set_number(),
            on_conflict: MergePolicy::default(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("g5_schedule.json")
}

fn default_first_set_number() -> i64 {
    1
}

impl Config {
    /// Load config from default locations
    pub fn load() -> Result<Self> {
        Self::load_with(None)
    }

    /// Load config, preferring an explicitly given file
    pub fn load_with(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Some(local) = Self::find_local_config() {
            return Self::load_from(&local);
        }

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                return Self::load_from(&global);
            }
        }

        Ok(Self::default())
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Find local .g5/config.toml walking up directories
    pub fn find_local_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = Self::local_config_path(&current);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// `.g5/config.toml` under `base`
    pub fn local_config_path(base: &Path) -> PathBuf {
        base.join(".g5").join("config.toml")
    }

    /// Global config path from the platform config directory
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "g5").map(|d| d.config_dir().join("config.toml"))
    }

    /// Schedule file path with priority:
    /// 1. explicit `--output`
    /// 2. `G5_SCHEDULE` env var
    /// 3. `schedule.output_path`
    pub fn schedule_path(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }

        if let Ok(env_path) = std::env::var(SCHEDULE_ENV) {
            if !env_path.is_empty() {
                return PathBuf::from(env_path);
            }
        }

        self.schedule.output_path.clone()
    }

    /// Calendar path, with `.ics` appended when configured and missing
    pub fn calendar_path(&self, requested: &Path) -> PathBuf {
        let has_ics = requested
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("ics"))
            .unwrap_or(false);

        if self.calendar.append_extension && !has_ics {
            let mut name = requested.as_os_str().to_os_string();
            name.push(".ics");
            PathBuf::from(name)
        } else {
            requested.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.schedule.output_path, PathBuf::from("g5_schedule.json"));
        assert_eq!(config.schedule.first_set_number, 1);
        assert_eq!(config.schedule.on_conflict, MergePolicy::Overwrite);
        assert!(config.calendar.emoji);
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [schedule]
            on_conflict = "reject"

            [calendar]
            emoji = false
            "#,
        )
        .unwrap();

        assert_eq!(config.schedule.on_conflict, MergePolicy::Reject);
        assert_eq!(config.schedule.first_set_number, 1);
        assert!(!config.calendar.emoji);
        assert!(config.calendar.append_extension);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = Config::local_config_path(dir.path());

        let mut config = Config::default();
        config.schedule.first_set_number = 11;
        config.save_to(&path).unwrap();

        let loaded = Config::load_with(Some(&path)).unwrap();
        assert_eq!(loaded.schedule.first_set_number, 11);
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let dir = tempdir().unwrap();
        assert!(Config::load_with(Some(&dir.path().join("none.toml"))).is_err());
    }

    #[test]
    fn test_explicit_output_wins() {
        let config = Config::default();
        let path = config.schedule_path(Some(Path::new("mine.json")));
        assert_eq!(path, PathBuf::from("mine.json"));
    }

    #[test]
    fn test_calendar_path_extension() {
        let config = Config::default();
        assert_eq!(config.calendar_path(Path::new("cal")), PathBuf::from("cal.ics"));
        assert_eq!(config.calendar_path(Path::new("cal.ICS")), PathBuf::from("cal.ICS"));

        let mut plain = Config::default();
        plain.calendar.append_extension = false;
        assert_eq!(plain.calendar_path(Path::new("cal")), PathBuf::from("cal"));
    }
}

//! `g5 config` command
//!
//! Get or set configuration values.
//!
//! # Usage
//! ```bash
//! g5 config                             # Show local config
//! g5 config schedule.on_conflict        # Get specific value
//! g5 config calendar.emoji false        # Set value
//! g5 config --path                      # Show config locations
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config key (e.g., schedule.output_path, calendar.emoji)
    pub key: Option<String>,

    /// Value to set
    pub value: Option<String>,

    /// List all config values
    #[arg(long)]
    pub list: bool,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Use global config instead of local .g5/config.toml
    #[arg(short, long)]
    pub global: bool,
}

fn get_config_path(global: bool) -> Result<PathBuf> {
    if global {
        Config::global_config_path().context("Cannot determine the global config directory")
    } else {
        Ok(Config::local_config_path(Path::new(".")))
    }
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let config_path = get_config_path(args.global)?;

    if args.path {
        if let Some(global) = Config::global_config_path() {
            println!("Global: {}", global.display());
        }
        println!("Local:  {}", Config::local_config_path(Path::new(".")).display());
        println!();
        if config_path.exists() {
            println!("✓ Active: {}", config_path.display());
        } else {
            println!("⚠ No config file found at {}", config_path.display());
        }
        return Ok(());
    }

    if args.list || (args.key.is_none() && args.value.is_none()) {
        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            println!("📋 Configuration ({}):\n", config_path.display());
            println!("{}", content);
        } else {
            println!("📋 No config file at {}, defaults in use:\n", config_path.display());
            println!("{}", toml::to_string_pretty(&Config::default())?);
        }
        return Ok(());
    }

    if let Some(key) = &args.key {
        if let Some(value) = &args.value {
            set_config_value(&config_path, key, value)?;
            println!("✅ Set {} = {} (in {})", key, value, config_path.display());
        } else {
            match get_config_value(&config_path, key)? {
                Some(v) => println!("{}", v),
                None => println!("(not set)"),
            }
        }
    }

    Ok(())
}

/// Set a nested config value using dot notation (e.g., "calendar.emoji")
fn set_config_value(path: &Path, key: &str, val: &str) -> Result<()> {
    use toml_edit::{value, DocumentMut};

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc: DocumentMut = content.parse().context("Failed to parse config.toml")?;

    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        [top] => doc[*top] = value(parse_toml_value(val)),
        [section, name] => {
            if doc.get(section).is_none() {
                doc[*section] = toml_edit::table();
            }
            doc[*section][*name] = value(parse_toml_value(val));
        }
        _ => bail!("Key too deep: {}. Max depth is section.key", key),
    }

    // Reject edits that would make the config unloadable
    toml::from_str::<Config>(&doc.to_string())
        .with_context(|| format!("Invalid value for {}: {}", key, val))?;

    fs::write(path, doc.to_string())?;
    Ok(())
}

/// Get a config value by dot notation key
fn get_config_value(path: &Path, key: &str) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let doc: toml::Table = content.parse().context("Failed to parse config.toml")?;

    let parts: Vec<&str> = key.split('.').collect();
    let val = match parts.as_slice() {
        [top] => doc.get(*top),
        [section, name] => doc.get(*section).and_then(|t| t.get(*name)),
        _ => None,
    };

    Ok(val.map(|v| match v {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }))
}

/// Parse string value to appropriate TOML type
fn parse_toml_value(s: &str) -> toml_edit::Value {
    if s == "true" {
        return toml_edit::Value::from(true);
    }
    if s == "false" {
        return toml_edit::Value::from(false);
    }
    if let Ok(i) = s.parse::<i64>() {
        return toml_edit::Value::from(i);
    }
    toml_edit::Value::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_and_get_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".g5").join("config.toml");

        set_config_value(&path, "schedule.on_conflict", "reject").unwrap();
        set_config_value(&path, "calendar.emoji", "false").unwrap();

        assert_eq!(
            get_config_value(&path, "schedule.on_conflict").unwrap(),
            Some("reject".to_string())
        );
        assert_eq!(
            get_config_value(&path, "calendar.emoji").unwrap(),
            Some("false".to_string())
        );

        let config = Config::load_from(&path).unwrap();
        assert!(!config.calendar.emoji);
    }

    #[test]
    fn test_invalid_value_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert!(set_config_value(&path, "schedule.on_conflict", "merge").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(get_config_value(&path, "schedule.output_path").unwrap(), None);
    }
}

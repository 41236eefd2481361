//! Tool configuration.
//!
//! Handles loading, validating, and merging the `gallery-order.toml` file.
//! User values are merged on top of stock defaults, so a config file only
//! needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [store]
//! path = "gallery-order.db"   # SQLite catalog holding every image
//!
//! [selection]
//! mode = "random"             # random | ascending | descending
//!
//! [logging]
//! level = "warn"              # used when RUST_LOG is not set
//! ```
//!
//! Unknown keys are rejected to catch typos early. The `--db` command line
//! flag overrides `store.path`.

use crate::types::Selector;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "gallery-order.toml";

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `gallery-order.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where items are persisted.
    pub store: StoreConfig,
    /// Default selection behavior for `next` and `cycle`.
    pub selection: SelectionConfig,
    /// Diagnostic output.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Path of the SQLite catalog. Relative paths resolve against the
    /// working directory.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "gallery-order.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    pub mode: Selector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default tracing filter (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store.path must not be empty".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.store.path)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// The stock defaults as a TOML table, the base layer for merging.
pub fn stock_defaults() -> Result<toml::Table, ConfigError> {
    Ok(toml::Table::try_from(Config::default())?)
}

/// Lay a user config over the stock defaults one `[section]` at a time.
///
/// A section in the user file overrides only the keys it names; every other
/// key of that section keeps its default.
pub fn overlay_sections(mut sections: toml::Table, user: toml::Table) -> toml::Table {
    for (name, section) in user {
        let merged = match (sections.remove(&name), section) {
            (Some(toml::Value::Table(mut keys)), toml::Value::Table(overrides)) => {
                keys.extend(overrides);
                toml::Value::Table(keys)
            }
            (_, section) => section,
        };
        sections.insert(name, merged);
    }
    sections
}

/// Read a config file as a raw TOML table. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Table>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let table: toml::Table = toml::from_str(&content)?;
    Ok(Some(table))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Table>) -> Result<Config, ConfigError> {
    let base = stock_defaults()?;
    let merged = match overlay {
        Some(user) => overlay_sections(base, user),
        None => base,
    };
    let config: Config = toml::Value::Table(merged).try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path`, falling back to defaults when it is absent.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// A fully-commented stock config file, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# gallery-order configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Storage
# ---------------------------------------------------------------------------
[store]
# SQLite catalog holding every image and its order within its gallery.
# Overridden by the --db flag.
path = "gallery-order.db"

# ---------------------------------------------------------------------------
# Selection
# ---------------------------------------------------------------------------
[selection]
# How `next` and `cycle` pick the following image:
#   random      - uniform draw, never the same image twice in a row
#   ascending   - forward through the order, wrapping to the first image
#   descending  - backward through the order, wrapping to the last image
mode = "random"

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# Diagnostic level on stderr when RUST_LOG is not set.
# One of: error, warn, info, debug, trace. -v raises it to debug.
level = "warn"
"##
}

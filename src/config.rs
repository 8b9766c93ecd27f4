//! Runtime settings resolved from the environment, falling back to a data
//! directory under the user's home.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::store::default_record_file;

/// Overrides the record file location.
pub const FILE_ENV: &str = "CONTACT_BOOK_FILE";
/// Overrides the log directory.
pub const LOG_DIR_ENV: &str = "CONTACT_BOOK_LOG_DIR";
/// Overrides the log level.
pub const LOG_LEVEL_ENV: &str = "CONTACT_BOOK_LOG";

const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_DIR_NAME: &str = "logs";
const SUPPORTED_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub record_file: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> Result<Self> {
        Self::resolve(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Blank values count
    /// as unset.
    pub fn resolve<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let record_file = match lookup(FILE_ENV) {
            Some(path) => PathBuf::from(path),
            None => default_record_file()?,
        };

        let log_dir = match lookup(LOG_DIR_ENV) {
            Some(path) => PathBuf::from(path),
            None => record_file
                .parent()
                .map(|parent| parent.join(LOG_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from(LOG_DIR_NAME)),
        };

        let log_level = lookup(LOG_LEVEL_ENV)
            .map(|level| level.trim().to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        if !SUPPORTED_LEVELS.contains(&log_level.as_str()) {
            bail!("unsupported log level `{log_level}` in {LOG_LEVEL_ENV}");
        }

        Ok(Self {
            record_file,
            log_dir,
            log_level,
        })
    }
}

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".contact-book";
/// Record file name stored inside the application data directory.
pub const RECORD_FILE_NAME: &str = "contacts.csv";

/// Resolve the application data directory inside the user's home.
pub fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Resolve the absolute path to the record file inside the user's home.
pub fn default_record_file() -> Result<PathBuf> {
    Ok(default_data_dir()?.join(RECORD_FILE_NAME))
}

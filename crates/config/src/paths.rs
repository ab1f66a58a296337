//! Filesystem locations

use std::path::PathBuf;

/// Data directory (`~/.esap`, or `./.esap` when no home directory exists)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".esap")
}

/// Config file location
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

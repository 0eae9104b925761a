//! Path resolution for interval-alarm configuration and data files.
//!
//! All data is stored in `~/.interval-alarm/` (or `$INTERVAL_ALARM_HOME`):
//! - `config.yaml` - Main configuration file
//! - `alarm.db` - SQLite database with session history
//! - `state.json` - Companion snapshot of the session in progress

use std::path::PathBuf;

use crate::error::AlarmError;

/// Environment variable that overrides the data root.
pub const HOME_ENV: &str = "INTERVAL_ALARM_HOME";

/// Paths to interval-alarm configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.interval-alarm/`
    pub root: PathBuf,
    /// Config file: `~/.interval-alarm/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.interval-alarm/alarm.db`
    pub database: PathBuf,
    /// Companion snapshot: `~/.interval-alarm/state.json`
    pub state_file: PathBuf,
}

impl Paths {
    /// Resolve paths from `$INTERVAL_ALARM_HOME`, falling back to the user's
    /// home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, AlarmError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            AlarmError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".interval-alarm")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("alarm.db"),
            state_file: root.join("state.json"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), AlarmError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                AlarmError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }
}

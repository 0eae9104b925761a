//! Configuration settings for interval-alarm.
//!
//! Settings are loaded from `~/.interval-alarm/config.yaml`.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::core::session::{DEFAULT_INTERVAL_SECONDS, DEFAULT_TOTAL_INTERVALS};
use crate::core::{IntervalConfig, SoundChoice};
use crate::error::AlarmError;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Interval timing.
    pub session: SessionConfig,
    /// Alert sounds and music tracks.
    pub sounds: SoundConfig,
    /// Rollover and completion notices.
    pub notifications: NotificationConfig,
    /// Companion snapshot publishing.
    pub sync: SyncConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Interval timing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds per interval.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u32,
    /// Intervals per session.
    #[serde(default = "default_total_intervals")]
    pub total_intervals: u32,
}

/// Names of the alternating alert sounds and music tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Alert played when intervals 1, 3, 5, ... finish.
    #[serde(default = "default_alert_a")]
    pub alert_a: String,
    /// Alert played when intervals 2, 4, 6, ... finish.
    #[serde(default = "default_alert_b")]
    pub alert_b: String,
    /// Music during intervals 1, 3, 5, ...
    #[serde(default = "default_music_a")]
    pub music_a: String,
    /// Music during intervals 2, 4, 6, ...
    #[serde(default = "default_music_b")]
    pub music_b: String,
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Ring the terminal bell when an interval finishes.
    #[serde(default = "default_true")]
    pub bell: bool,
    /// Print a summary when the session completes.
    #[serde(default = "default_true")]
    pub completion_summary: bool,
}

/// Companion snapshot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Write `state.json` while a session runs.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Minimum seconds between snapshot writes caused by ticks.
    #[serde(default = "default_tick_publish_seconds")]
    pub tick_publish_seconds: u32,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

const fn default_interval_seconds() -> u32 {
    DEFAULT_INTERVAL_SECONDS
}

const fn default_total_intervals() -> u32 {
    DEFAULT_TOTAL_INTERVALS
}

fn default_alert_a() -> String {
    "chime".to_string()
}

fn default_alert_b() -> String {
    "gong".to_string()
}

fn default_music_a() -> String {
    "ambient-a".to_string()
}

fn default_music_b() -> String {
    "ambient-b".to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_tick_publish_seconds() -> u32 {
    15
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            total_intervals: default_total_intervals(),
        }
    }
}

impl SessionConfig {
    /// Timing configuration for the controller.
    #[must_use]
    pub fn interval_config(&self) -> IntervalConfig {
        IntervalConfig::new(self.interval_seconds, self.total_intervals)
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            alert_a: default_alert_a(),
            alert_b: default_alert_b(),
            music_a: default_music_a(),
            music_b: default_music_b(),
        }
    }
}

impl SoundConfig {
    /// Name of the alert sound for a choice.
    #[must_use]
    pub fn alert(&self, choice: SoundChoice) -> &str {
        choice.pick(&self.alert_a, &self.alert_b)
    }

    /// Name of the music track for a choice.
    #[must_use]
    pub fn music(&self, choice: SoundChoice) -> &str {
        choice.pick(&self.music_a, &self.music_b)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            bell: default_true(),
            completion_summary: default_true(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            tick_publish_seconds: default_tick_publish_seconds(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, AlarmError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, AlarmError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            AlarmError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            AlarmError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save(&self) -> Result<(), AlarmError> {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        self.save_to_path(&paths.config_file)
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), AlarmError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| AlarmError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            AlarmError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }
}

//! Configuration management for interval-alarm.
//!
//! This module handles loading and saving configuration from
//! `~/.interval-alarm/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{
    ColorSetting, Config, GeneralConfig, NotificationConfig, SessionConfig, SoundConfig,
    SyncConfig,
};

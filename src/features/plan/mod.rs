//! Session schedule preview.
//!
//! The schedule is fully determined by the interval configuration: interval
//! `n` starts at `n * interval_seconds` and alternates sounds by parity.

use serde::Serialize;

use crate::config::SoundConfig;
use crate::core::display::format_mmss;
use crate::core::{IntervalConfig, SoundChoice};

/// One interval in the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedInterval {
    /// 1-based interval number.
    pub number: u32,
    /// Seconds from session start until this interval begins.
    pub starts_at_seconds: u64,
    /// Alert/music choice for the interval.
    pub choice: SoundChoice,
    /// Alert sound played when the interval ends.
    pub alert: String,
    /// Music track during the interval.
    pub music: String,
}

/// The full schedule of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionPlan {
    /// Seconds per interval.
    pub interval_seconds: u32,
    /// Intervals in the session.
    pub total_intervals: u32,
    /// Session length in seconds.
    pub total_seconds: u64,
    /// Intervals in order.
    pub intervals: Vec<PlannedInterval>,
}

impl SessionPlan {
    /// Build the schedule for a configuration.
    #[must_use]
    pub fn build(config: IntervalConfig, sounds: &SoundConfig) -> Self {
        let interval_seconds = config.interval_seconds();
        let intervals = (0..config.total_intervals())
            .map(|index| {
                let choice = SoundChoice::for_interval(index);
                PlannedInterval {
                    number: index + 1,
                    starts_at_seconds: u64::from(index) * u64::from(interval_seconds),
                    choice,
                    alert: sounds.alert(choice).to_string(),
                    music: sounds.music(choice).to_string(),
                }
            })
            .collect();

        Self {
            interval_seconds,
            total_intervals: config.total_intervals(),
            total_seconds: config.session_seconds(),
            intervals,
        }
    }
}

impl PlannedInterval {
    /// Start offset as `mm:ss`.
    #[must_use]
    pub fn start_offset_display(&self) -> String {
        u32::try_from(self.starts_at_seconds)
            .map_or_else(|_| format!("{}s", self.starts_at_seconds), format_mmss)
    }
}

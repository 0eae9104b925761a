//! Point-in-time view of the controller for companion displays.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SoundConfig;
use crate::core::display::format_mmss;
use crate::core::{Clock, IntervalController, Phase};

/// Published session state.
///
/// Written to `state.json` by the running host and read back by `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Controller phase.
    pub phase: Phase,
    /// 0-based index of the interval in progress.
    pub interval_index: u32,
    /// Intervals in the session.
    pub total_intervals: u32,
    /// Seconds per interval.
    pub interval_seconds: u32,
    /// Countdown when the snapshot was taken.
    pub seconds_remaining: u32,
    /// When the current interval ends; present only while running.
    pub interval_ends_at: Option<DateTime<Utc>>,
    /// When the session started.
    pub session_started_at: Option<DateTime<Utc>>,
    /// Alert sound for the current interval.
    pub alert: String,
    /// Music track for the current interval.
    pub music: String,
    /// Overall session progress in `[0, 1]`.
    pub progress: f64,
    /// When the snapshot was taken.
    pub updated_at: DateTime<Utc>,
}

impl SessionSnapshot {
    /// Capture the controller's current state.
    #[must_use]
    pub fn capture<C: Clock>(ctrl: &IntervalController<C>, sounds: &SoundConfig) -> Self {
        let interval_ends_at = ctrl
            .interval_started_at()
            .map(|anchor| anchor + Duration::seconds(i64::from(ctrl.interval_seconds())));

        Self {
            phase: ctrl.phase(),
            interval_index: ctrl.current_interval_index(),
            total_intervals: ctrl.total_intervals(),
            interval_seconds: ctrl.interval_seconds(),
            seconds_remaining: ctrl.seconds_remaining(),
            interval_ends_at,
            session_started_at: ctrl.session_started_at(),
            alert: sounds.alert(ctrl.current_alert_choice()).to_string(),
            music: sounds.music(ctrl.current_music_choice()).to_string(),
            progress: ctrl.progress_fraction(),
            updated_at: ctrl.clock().now(),
        }
    }

    /// Countdown as of `now`.
    ///
    /// While running this is derived from the interval end time, so a reader
    /// sees a live value between publishes. Other phases report the stored
    /// countdown.
    #[must_use]
    pub fn projected_seconds_remaining(&self, now: DateTime<Utc>) -> u32 {
        match (self.phase, self.interval_ends_at) {
            (Phase::Running, Some(ends_at)) => {
                let left = ends_at.signed_duration_since(now).num_seconds();
                u32::try_from(left.max(0))
                    .unwrap_or(self.interval_seconds)
                    .min(self.interval_seconds)
            }
            _ => self.seconds_remaining,
        }
    }

    /// A running snapshot whose interval ended over `grace` ago.
    ///
    /// The host publishes at every rollover, so this means it is gone.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>, grace: Duration) -> bool {
        match (self.phase, self.interval_ends_at) {
            (Phase::Running, Some(ends_at)) => now > ends_at + grace,
            _ => false,
        }
    }

    /// One-line summary, e.g. `Interval 2 of 10  02:41  chime / ambient-b`.
    #[must_use]
    pub fn status_line(&self, now: DateTime<Utc>) -> String {
        let number = self.interval_index + 1;
        let total = self.total_intervals;
        let countdown = format_mmss(self.projected_seconds_remaining(now));
        match self.phase {
            Phase::Idle => "Ready".to_string(),
            Phase::Completed => "Session complete".to_string(),
            Phase::Running => format!(
                "Interval {number} of {total}  {countdown}  {} / {}",
                self.alert, self.music
            ),
            Phase::Paused => format!("Paused (interval {number} of {total})  {countdown}"),
        }
    }
}

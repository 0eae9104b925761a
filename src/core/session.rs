//! The session entity and the per-session interval configuration.

use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};

/// Seconds per interval in the production program (3 minutes).
pub const DEFAULT_INTERVAL_SECONDS: u32 = 180;

/// Intervals per session in the production program.
pub const DEFAULT_TOTAL_INTERVALS: u32 = 10;

/// Timing configuration for one session.
///
/// Both values are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalConfig {
    interval_seconds: u32,
    total_intervals: u32,
}

impl IntervalConfig {
    /// Create a configuration, clamping zero values to 1.
    #[must_use]
    pub fn new(interval_seconds: u32, total_intervals: u32) -> Self {
        Self {
            interval_seconds: interval_seconds.max(1),
            total_intervals: total_intervals.max(1),
        }
    }

    /// Seconds per interval.
    #[must_use]
    pub const fn interval_seconds(&self) -> u32 {
        self.interval_seconds
    }

    /// Number of intervals in a session.
    #[must_use]
    pub const fn total_intervals(&self) -> u32 {
        self.total_intervals
    }

    /// Length of a full session in seconds.
    #[must_use]
    pub const fn session_seconds(&self) -> u64 {
        self.interval_seconds as u64 * self.total_intervals as u64
    }
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_SECONDS, DEFAULT_TOTAL_INTERVALS)
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    /// Still in progress.
    Active,
    /// Ran all of its intervals.
    Completed,
    /// Stopped before the last interval finished.
    Stopped,
}

impl std::fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Completed => write!(f, "Completed"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

/// One run of the interval program.
///
/// Created by the host when the user starts a run and handed to the
/// controller, which owns it until `stop()` hands it back. The controller only
/// touches `completed_intervals`, `ended_at`, and `is_completed`; once
/// `ended_at` is set the session is no longer modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Database ID (None until persisted).
    pub id: Option<i64>,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// When the session ended (None while active).
    pub ended_at: Option<DateTime<Utc>>,
    /// Seconds per interval this session ran with.
    pub interval_seconds: u32,
    /// Number of intervals in the session.
    pub total_intervals: u32,
    /// Intervals finished so far.
    pub completed_intervals: u32,
    /// Whether every interval ran to the end.
    pub is_completed: bool,
}

impl Session {
    /// Create a fresh session for the given configuration.
    #[must_use]
    pub const fn new(config: IntervalConfig, started_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            started_at,
            ended_at: None,
            interval_seconds: config.interval_seconds(),
            total_intervals: config.total_intervals(),
            completed_intervals: 0,
            is_completed: false,
        }
    }

    /// Whether the session has not ended yet.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    /// How the session ended, or `Active`.
    #[must_use]
    pub const fn outcome(&self) -> SessionOutcome {
        if self.ended_at.is_none() {
            SessionOutcome::Active
        } else if self.is_completed {
            SessionOutcome::Completed
        } else {
            SessionOutcome::Stopped
        }
    }

    /// Wall-clock length of a finished session.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.ended_at
            .map(|end| end.signed_duration_since(self.started_at))
    }

    /// Time spent in finished intervals.
    #[must_use]
    pub fn interval_time(&self) -> Duration {
        Duration::seconds(i64::from(self.completed_intervals) * i64::from(self.interval_seconds))
    }

    /// Start time in the local timezone.
    #[must_use]
    pub fn started_at_local(&self) -> DateTime<Local> {
        self.started_at.with_timezone(&Local)
    }
}

//! Session reports.
//!
//! Summarizes session history over a period.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::storage::SessionStorage;
use crate::core::display::{format_duration, render_progress_bar};
use crate::core::{Session, SessionOutcome};
use crate::error::AlarmError;

/// Report time period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// Today only
    Today,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// All time
    All,
}

impl ReportPeriod {
    /// Start and (exclusive) end of this period, in UTC days.
    #[must_use]
    pub fn date_range_at(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();
        let start = match self {
            Self::Today => today,
            Self::Week => today - Duration::days(6),
            Self::Month => today - Duration::days(29),
            Self::All => DateTime::<Utc>::UNIX_EPOCH.date_naive(),
        };
        let end = today + Duration::days(1);
        (
            start.and_time(NaiveTime::MIN).and_utc(),
            end.and_time(NaiveTime::MIN).and_utc(),
        )
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "Last 7 Days",
            Self::Month => "Last 30 Days",
            Self::All => "All Time",
        }
    }
}

/// Aggregated session statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Report period name
    pub period: String,
    /// Sessions started in the period (including one in progress)
    pub sessions_started: usize,
    /// Sessions that ran every interval
    pub completed_sessions: usize,
    /// Sessions stopped early
    pub stopped_sessions: usize,
    /// Completed share of finished sessions, 0.0 - 1.0
    pub completion_rate: f64,
    /// Intervals finished across all sessions
    pub intervals_completed: u64,
    /// Minutes spent in finished intervals
    pub interval_minutes: i64,
    /// Per-day breakdown, newest first
    pub daily: Vec<DailyIntervals>,
    /// Consecutive days (ending today or yesterday) with a completed session
    pub streak_days: i64,
}

/// Intervals per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyIntervals {
    /// Date
    pub date: NaiveDate,
    /// Sessions started that day
    pub sessions: usize,
    /// Intervals finished that day
    pub intervals: u64,
}

impl SessionReport {
    /// Generate a report for the given period.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read.
    pub fn generate(storage: &SessionStorage, period: ReportPeriod) -> Result<Self, AlarmError> {
        let now = Utc::now();
        let (start, end) = period.date_range_at(now);
        let sessions = storage.get_range(start, end)?;
        Ok(Self::from_sessions(
            period.display_name(),
            &sessions,
            Local::now().date_naive(),
        ))
    }

    /// Build a report from already-loaded sessions.
    #[must_use]
    pub fn from_sessions(period: &str, sessions: &[Session], today: NaiveDate) -> Self {
        let completed_sessions = sessions
            .iter()
            .filter(|s| s.outcome() == SessionOutcome::Completed)
            .count();
        let stopped_sessions = sessions
            .iter()
            .filter(|s| s.outcome() == SessionOutcome::Stopped)
            .count();

        let finished = completed_sessions + stopped_sessions;
        #[allow(clippy::cast_precision_loss)]
        let completion_rate = if finished > 0 {
            completed_sessions as f64 / finished as f64
        } else {
            0.0
        };

        let intervals_completed = sessions
            .iter()
            .map(|s| u64::from(s.completed_intervals))
            .sum();
        let interval_minutes = sessions
            .iter()
            .map(|s| s.interval_time().num_seconds())
            .sum::<i64>()
            / 60;

        let mut daily_map: BTreeMap<NaiveDate, (usize, u64)> = BTreeMap::new();
        for session in sessions {
            let entry = daily_map
                .entry(session.started_at_local().date_naive())
                .or_insert((0, 0));
            entry.0 += 1;
            entry.1 += u64::from(session.completed_intervals);
        }
        let daily = daily_map
            .into_iter()
            .rev()
            .map(|(date, (sessions, intervals))| DailyIntervals {
                date,
                sessions,
                intervals,
            })
            .collect();

        let completed_days: Vec<NaiveDate> = sessions
            .iter()
            .filter(|s| s.outcome() == SessionOutcome::Completed)
            .map(|s| s.started_at_local().date_naive())
            .collect();

        Self {
            period: period.to_string(),
            sessions_started: sessions.len(),
            completed_sessions,
            stopped_sessions,
            completion_rate,
            intervals_completed,
            interval_minutes,
            daily,
            streak_days: calculate_streak(&completed_days, today),
        }
    }

    /// Format the report for display.
    #[must_use]
    pub fn format(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Interval Report: {}", self.period));
        lines.push("═".repeat(50));
        lines.push(String::new());

        lines.push("Summary".to_string());
        lines.push("─".repeat(40));
        lines.push(format!("  Sessions started:    {}", self.sessions_started));
        lines.push(format!("  Completed:           {}", self.completed_sessions));
        lines.push(format!("  Stopped early:       {}", self.stopped_sessions));
        lines.push(format!(
            "  Completion rate:     {} {:.0}%",
            render_progress_bar(self.completion_rate, 20),
            self.completion_rate * 100.0
        ));
        lines.push(format!("  Intervals finished:  {}", self.intervals_completed));
        lines.push(format!(
            "  Time in intervals:   {}",
            format_duration(Duration::minutes(self.interval_minutes))
        ));
        lines.push(format!("  Current streak:      {} days", self.streak_days));

        if !self.daily.is_empty() {
            lines.push(String::new());
            lines.push("Recent Days".to_string());
            lines.push("─".repeat(40));

            for day in self.daily.iter().take(7) {
                lines.push(format!(
                    "  {} {:>3} intervals ({} sessions)",
                    day.date, day.intervals, day.sessions
                ));
            }
        }

        lines.join("\n")
    }
}

/// Count consecutive days with a completed session, ending today (or
/// yesterday, if nothing has completed yet today).
fn calculate_streak(days: &[NaiveDate], today: NaiveDate) -> i64 {
    let mut dates = days.to_vec();
    dates.sort_unstable();
    dates.dedup();

    let mut check_date = today;
    if dates.binary_search(&check_date).is_err() {
        check_date = today - Duration::days(1);
    }

    let mut streak = 0;
    while dates.binary_search(&check_date).is_ok() {
        streak += 1;
        check_date -= Duration::days(1);
    }

    streak
}

//! Command implementations for interval-alarm.
//!
//! Each command returns the text to print; the binary prints it.

mod config;
mod run;
mod shell;

pub use config::config;
pub use run::run;
pub use shell::completions;

use chrono::{Duration, Utc};
use serde_json::json;

use crate::cli::args::{OutputFormat, TimingArgs};
use crate::config::{Config, Paths};
use crate::core::Phase;
use crate::error::AlarmError;
use crate::features::history::{ReportPeriod, SessionReport, SessionStorage};
use crate::features::plan::SessionPlan;
use crate::features::sync::{CompanionSync, FileSync};
use crate::output::{format_plan, format_sessions, to_json};

/// Grace period after a published interval end before the snapshot is
/// considered abandoned.
const STALE_GRACE_SECONDS: i64 = 5;

/// Execute status command
///
/// # Errors
///
/// Returns an error if the snapshot exists but cannot be read.
pub fn status(paths: &Paths, format: OutputFormat) -> Result<String, AlarmError> {
    let snapshot = FileSync::from_paths(paths).read()?;
    let now = Utc::now();

    let Some(snapshot) = snapshot.filter(|s| s.phase != Phase::Idle) else {
        return match format {
            OutputFormat::Json => to_json(&json!({ "phase": Phase::Idle })),
            OutputFormat::Pretty => Ok("No session in progress".to_string()),
        };
    };

    let stale = snapshot.is_stale(now, Duration::seconds(STALE_GRACE_SECONDS));
    match format {
        OutputFormat::Json => to_json(&json!({
            "phase": snapshot.phase,
            "interval_index": snapshot.interval_index,
            "total_intervals": snapshot.total_intervals,
            "seconds_remaining": snapshot.projected_seconds_remaining(now),
            "alert": snapshot.alert,
            "music": snapshot.music,
            "progress": snapshot.progress,
            "updated_at": snapshot.updated_at,
            "stale": stale,
        })),
        OutputFormat::Pretty => {
            let mut line = snapshot.status_line(now);
            if stale {
                line.push_str("  (stale: no running session has updated this)");
            }
            Ok(line)
        }
    }
}

/// Execute history command
///
/// # Errors
///
/// Returns an error if the database cannot be read.
pub fn history(paths: &Paths, limit: usize, format: OutputFormat) -> Result<String, AlarmError> {
    let storage = SessionStorage::open(paths)?;
    let sessions = storage.get_recent(limit)?;
    format_sessions(&sessions, "Recent Sessions", format)
}

/// Execute report command
///
/// # Errors
///
/// Returns an error if the database cannot be read.
pub fn report(
    paths: &Paths,
    period: ReportPeriod,
    format: OutputFormat,
) -> Result<String, AlarmError> {
    let storage = SessionStorage::open(paths)?;
    let report = SessionReport::generate(&storage, period)?;
    match format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Pretty => Ok(report.format()),
    }
}

/// Execute plan command
///
/// # Errors
///
/// Returns an error if the timing overrides are invalid.
pub fn plan(
    config: &Config,
    timing: &TimingArgs,
    format: OutputFormat,
) -> Result<String, AlarmError> {
    let interval = timing.resolve(&config.session)?;
    let plan = SessionPlan::build(interval, &config.sounds);
    format_plan(&plan, format)
}

/// Execute clear command
///
/// # Errors
///
/// Returns an error without `force`, or if the history cannot be deleted.
pub fn clear(paths: &Paths, force: bool, format: OutputFormat) -> Result<String, AlarmError> {
    if !force {
        return Err(AlarmError::Config(
            "Refusing to delete session history without --force".to_string(),
        ));
    }

    let storage = SessionStorage::open(paths)?;
    let deleted = storage.delete_all()?;
    FileSync::from_paths(paths).clear()?;

    match format {
        OutputFormat::Json => to_json(&json!({ "deleted": deleted })),
        OutputFormat::Pretty => Ok(format!("Deleted {deleted} sessions")),
    }
}

//! Output formatting for interval-alarm.
//!
//! This module provides formatters for displaying sessions and schedules in
//! various formats.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::core::Session;
use crate::error::AlarmError;
use crate::features::plan::SessionPlan;

pub use json::*;
pub use pretty::*;

/// Format sessions based on output format
///
/// # Errors
///
/// Returns `AlarmError::Parse` if JSON serialization fails.
pub fn format_sessions(
    sessions: &[Session],
    title: &str,
    format: OutputFormat,
) -> Result<String, AlarmError> {
    match format {
        OutputFormat::Pretty => Ok(format_sessions_pretty(sessions, title)),
        OutputFormat::Json => format_sessions_json(sessions, title),
    }
}

/// Format a single session based on output format
///
/// # Errors
///
/// Returns `AlarmError::Parse` if JSON serialization fails.
pub fn format_session(session: &Session, format: OutputFormat) -> Result<String, AlarmError> {
    match format {
        OutputFormat::Pretty => Ok(format_session_pretty(session)),
        OutputFormat::Json => format_session_json(session),
    }
}

/// Format a schedule based on output format
///
/// # Errors
///
/// Returns `AlarmError::Parse` if JSON serialization fails.
pub fn format_plan(plan: &SessionPlan, format: OutputFormat) -> Result<String, AlarmError> {
    match format {
        OutputFormat::Pretty => Ok(format_plan_pretty(plan)),
        OutputFormat::Json => to_json(plan),
    }
}

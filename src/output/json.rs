//! JSON output formatting.

use serde::Serialize;
use serde_json::json;

use crate::core::Session;
use crate::error::AlarmError;

/// Format sessions as JSON
///
/// # Errors
///
/// Returns `AlarmError::Parse` if JSON serialization fails.
pub fn format_sessions_json(sessions: &[Session], title: &str) -> Result<String, AlarmError> {
    let items: Vec<_> = sessions.iter().map(session_value).collect();
    let output = json!({
        "list": title,
        "count": sessions.len(),
        "items": items
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a single session as JSON
///
/// # Errors
///
/// Returns `AlarmError::Parse` if JSON serialization fails.
pub fn format_session_json(session: &Session) -> Result<String, AlarmError> {
    Ok(serde_json::to_string_pretty(&session_value(session))?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `AlarmError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, AlarmError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// A session plus its derived outcome.
fn session_value(session: &Session) -> serde_json::Value {
    json!({
        "id": session.id,
        "started_at": session.started_at,
        "ended_at": session.ended_at,
        "interval_seconds": session.interval_seconds,
        "total_intervals": session.total_intervals,
        "completed_intervals": session.completed_intervals,
        "is_completed": session.is_completed,
        "outcome": session.outcome(),
    })
}

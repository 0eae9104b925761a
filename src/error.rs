//! Error types for interval-alarm.
//!
//! The session controller itself never fails; these errors come from the
//! layers around it (configuration, storage, snapshot publishing, terminal).

use thiserror::Error;

/// Errors raised by the host and collaborator layers.
#[derive(Debug, Error)]
pub enum AlarmError {
    /// Configuration could not be loaded, saved, or interpreted.
    #[error("configuration error: {0}")]
    Config(String),

    /// The session database failed.
    #[error("database error: {0}")]
    Database(String),

    /// A requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input or stored data could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The terminal could not be set up or drawn to.
    #[error("terminal error: {0}")]
    Terminal(String),

    /// Filesystem I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AlarmError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(format!("JSON: {e}"))
    }
}

impl From<serde_yaml::Error> for AlarmError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(format!("YAML: {e}"))
    }
}

impl From<rusqlite::Error> for AlarmError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AlarmError::NotFound("session 7".to_string());
        assert_eq!(err.to_string(), "not found: session 7");

        let err = AlarmError::Config("bad interval".to_string());
        assert_eq!(err.to_string(), "configuration error: bad interval");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AlarmError = json_err.into();
        assert!(matches!(err, AlarmError::Parse(_)));
    }
}

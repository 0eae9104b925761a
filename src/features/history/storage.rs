//! Session storage.
//!
//! Persists interval sessions to the local database.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension, Row};

use crate::config::Paths;
use crate::core::Session;
use crate::error::AlarmError;
use crate::storage::Database;

const SESSION_COLUMNS: &str = "id, started_at, ended_at, interval_seconds, total_intervals, \
                               completed_intervals, is_completed";

/// Storage for interval sessions.
pub struct SessionStorage {
    db: Database,
}

impl SessionStorage {
    /// Open storage in the default database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(paths: &Paths) -> Result<Self, AlarmError> {
        let db = Database::open(paths)?;
        Ok(Self { db })
    }

    /// Create storage with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }

    /// Save a session.
    ///
    /// If the session has an ID, it will be updated. Otherwise, it will be
    /// inserted and the new ID written back.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save(&self, session: &mut Session) -> Result<(), AlarmError> {
        match session.id {
            Some(id) => self.update(id, session),
            None => self.insert(session),
        }
    }

    fn insert(&self, session: &mut Session) -> Result<(), AlarmError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO interval_sessions
              (started_at, ended_at, interval_seconds, total_intervals, completed_intervals, is_completed)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                db_time(session.started_at),
                session.ended_at.map(db_time),
                session.interval_seconds,
                session.total_intervals,
                session.completed_intervals,
                session.is_completed,
            ],
        )
        .map_err(|e| AlarmError::Database(format!("Failed to insert session: {e}")))?;

        session.id = Some(conn.last_insert_rowid());
        Ok(())
    }

    fn update(&self, id: i64, session: &Session) -> Result<(), AlarmError> {
        let rows = self
            .db
            .connection()
            .execute(
                r"UPDATE interval_sessions SET
                  started_at = ?1,
                  ended_at = ?2,
                  interval_seconds = ?3,
                  total_intervals = ?4,
                  completed_intervals = ?5,
                  is_completed = ?6
                  WHERE id = ?7",
                params![
                    db_time(session.started_at),
                    session.ended_at.map(db_time),
                    session.interval_seconds,
                    session.total_intervals,
                    session.completed_intervals,
                    session.is_completed,
                    id,
                ],
            )
            .map_err(|e| AlarmError::Database(format!("Failed to update session: {e}")))?;

        if rows == 0 {
            return Err(AlarmError::NotFound(format!("session {id}")));
        }
        Ok(())
    }

    /// Get a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, id: i64) -> Result<Option<Session>, AlarmError> {
        self.db
            .connection()
            .query_row(
                &format!("SELECT {SESSION_COLUMNS} FROM interval_sessions WHERE id = ?1"),
                [id],
                row_to_session,
            )
            .optional()
            .map_err(|e| AlarmError::Database(format!("Failed to query session: {e}")))
    }

    /// Get the most recent session that has not ended.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_active(&self) -> Result<Option<Session>, AlarmError> {
        self.db
            .connection()
            .query_row(
                &format!(
                    "SELECT {SESSION_COLUMNS} FROM interval_sessions
                     WHERE ended_at IS NULL
                     ORDER BY started_at DESC
                     LIMIT 1"
                ),
                [],
                row_to_session,
            )
            .optional()
            .map_err(|e| AlarmError::Database(format!("Failed to query active session: {e}")))
    }

    /// Get the most recent sessions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_recent(&self, limit: usize) -> Result<Vec<Session>, AlarmError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query(
            &format!(
                "SELECT {SESSION_COLUMNS} FROM interval_sessions
                 ORDER BY started_at DESC, id DESC
                 LIMIT ?1"
            ),
            params![limit],
        )
    }

    /// Get sessions started in `[start, end)`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>, AlarmError> {
        self.query(
            &format!(
                "SELECT {SESSION_COLUMNS} FROM interval_sessions
                 WHERE started_at >= ?1 AND started_at < ?2
                 ORDER BY started_at DESC, id DESC"
            ),
            params![db_time(start), db_time(end)],
        )
    }

    /// Delete a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&self, id: i64) -> Result<bool, AlarmError> {
        let rows = self
            .db
            .connection()
            .execute("DELETE FROM interval_sessions WHERE id = ?1", [id])
            .map_err(|e| AlarmError::Database(format!("Failed to delete session: {e}")))?;

        Ok(rows > 0)
    }

    /// Delete every session. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_all(&self) -> Result<usize, AlarmError> {
        self.db
            .connection()
            .execute("DELETE FROM interval_sessions", [])
            .map_err(|e| AlarmError::Database(format!("Failed to delete sessions: {e}")))
    }

    fn query(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Session>, AlarmError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| AlarmError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params, row_to_session)
            .map_err(|e| AlarmError::Database(format!("Failed to query sessions: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| AlarmError::Database(e.to_string()))
    }
}

/// Timestamps are stored as second-precision RFC 3339 in UTC so that they
/// compare correctly as text.
fn db_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Convert a database row to a Session.
fn row_to_session(row: &Row<'_>) -> Result<Session, rusqlite::Error> {
    let started_at: String = row.get(1)?;
    let ended_at: Option<String> = row.get(2)?;

    Ok(Session {
        id: Some(row.get(0)?),
        started_at: parse_timestamp(1, &started_at)?,
        ended_at: ended_at.map(|s| parse_timestamp(2, &s)).transpose()?,
        interval_seconds: row.get(3)?,
        total_intervals: row.get(4)?,
        completed_intervals: row.get(5)?,
        is_completed: row.get(6)?,
    })
}

fn parse_timestamp(column: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

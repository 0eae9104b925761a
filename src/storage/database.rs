//! `SQLite` handle for `~/.interval-alarm/alarm.db`.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::config::Paths;
use crate::error::AlarmError;

use super::migrations;

/// How long a reader waits on a lock held by a running session's write.
const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

/// A migrated connection to the history database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open `alarm.db` under the data root, creating the root if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the file cannot
    /// be opened, or a migration fails.
    pub fn open(paths: &Paths) -> Result<Self, AlarmError> {
        paths.ensure_dirs()?;
        Self::open_at(&paths.database)
    }

    /// Open (or create) a database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or a migration fails.
    pub fn open_at(path: &Path) -> Result<Self, AlarmError> {
        let conn = Connection::open(path).map_err(|e| {
            AlarmError::Database(format!("Failed to open {}: {e}", path.display()))
        })?;
        Self::prepare(conn)
    }

    /// Throwaway database for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, AlarmError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AlarmError::Database(format!("Failed to open in-memory database: {e}")))?;
        Self::prepare(conn)
    }

    fn prepare(conn: Connection) -> Result<Self, AlarmError> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| AlarmError::Database(format!("Failed to set busy timeout: {e}")))?;
        migrations::run(&conn)?;
        Ok(Self { conn })
    }

    /// Schema version recorded in the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the pragma cannot be read.
    pub fn schema_version(&self) -> Result<i32, AlarmError> {
        migrations::get_version(&self.conn)
    }

    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn in_memory_is_migrated() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), migrations::LATEST_VERSION);
    }

    #[test]
    fn open_creates_data_root() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested").join("data"));

        Database::open(&paths).unwrap();
        assert!(paths.database.exists());
    }

    #[test]
    fn reopen_keeps_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("alarm.db");

        Database::open_at(&path)
            .unwrap()
            .connection()
            .execute(
                "INSERT INTO interval_sessions (started_at, interval_seconds, total_intervals)
                 VALUES ('2024-01-01T10:00:00+00:00', 180, 10)",
                [],
            )
            .unwrap();

        let db = Database::open_at(&path).unwrap();
        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM interval_sessions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}

//! Schema migrations keyed on `PRAGMA user_version`.
//!
//! `MIGRATIONS[n]` upgrades a database from version `n` to `n + 1`. Each step
//! runs inside its own transaction together with the version bump, so a
//! failed step leaves the previous version intact.

use rusqlite::Connection;

use crate::error::AlarmError;

type Migration = fn(&Connection) -> rusqlite::Result<()>;

const MIGRATIONS: &[Migration] = &[create_interval_sessions];

/// Schema version a fully migrated database reports.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const LATEST_VERSION: i32 = MIGRATIONS.len() as i32;

/// Read `user_version`; a fresh file reports 0.
pub fn get_version(conn: &Connection) -> Result<i32, AlarmError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| AlarmError::Database(format!("Failed to read schema version: {e}")))
}

/// Bring the schema up to [`LATEST_VERSION`].
pub fn run(conn: &Connection) -> Result<(), AlarmError> {
    let from = get_version(conn)?;
    if from > LATEST_VERSION {
        return Err(AlarmError::Database(format!(
            "Database schema v{from} is newer than this build supports (v{LATEST_VERSION})"
        )));
    }

    let applied = usize::try_from(from).unwrap_or(0);
    for (step, migrate) in MIGRATIONS.iter().enumerate().skip(applied) {
        let target = step + 1;
        apply(conn, *migrate, target)
            .map_err(|e| AlarmError::Database(format!("Migration to v{target} failed: {e}")))?;
        tracing::debug!(version = target, "applied schema migration");
    }
    Ok(())
}

fn apply(conn: &Connection, migrate: Migration, target: usize) -> rusqlite::Result<()> {
    conn.execute_batch("BEGIN")?;
    let result = migrate(conn)
        .and_then(|()| conn.execute_batch(&format!("PRAGMA user_version = {target};")));
    match result {
        Ok(()) => conn.execute_batch("COMMIT"),
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

fn create_interval_sessions(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS interval_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            ended_at TEXT,
            interval_seconds INTEGER NOT NULL,
            total_intervals INTEGER NOT NULL,
            completed_intervals INTEGER NOT NULL DEFAULT 0,
            is_completed INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_interval_sessions_started
        ON interval_sessions(started_at);
        ",
    )
}

//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Build the r2d2 connection manager for file or shared in-memory targets.
//! - Configure connection pragmas required by core behavior.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a busy timeout.
//! - File connections run in WAL mode so readers never block the writer.

use super::{DbError, DbResult, StorageTarget};
use log::{debug, error};
use r2d2::ManageConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use std::time::{Duration, Instant};

/// Per-connection settings applied right after open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub busy_timeout: Duration,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Builds the connection manager used by the pool for `target`.
///
/// Every connection it opens runs [`configure_connection`] before use.
pub(super) fn connection_manager(
    target: &StorageTarget,
    options: ConnectionOptions,
) -> SqliteConnectionManager {
    let manager = match target {
        StorageTarget::File(path) => SqliteConnectionManager::file(path),
        StorageTarget::Memory { name } => {
            SqliteConnectionManager::file(format!("file:{name}?mode=memory&cache=shared"))
        }
    };
    let mode = target.mode();
    let use_wal = matches!(target, StorageTarget::File(_));
    manager
        .with_flags(open_flags())
        .with_init(move |conn| configure_connection(conn, mode, use_wal, options))
}

/// Opens one configured connection to `target` outside the pool.
///
/// # Side effects
/// - Creates the database file when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_connection(target: &StorageTarget, options: ConnectionOptions) -> DbResult<Connection> {
    let started_at = Instant::now();
    connection_manager(target, options).connect().map_err(|err| {
        error!(
            "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
            target.mode(),
            started_at.elapsed().as_millis(),
            err
        );
        DbError::from(err)
    })
}

fn open_flags() -> OpenFlags {
    OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
}

fn configure_connection(
    conn: &mut Connection,
    mode: &'static str,
    use_wal: bool,
    options: ConnectionOptions,
) -> rusqlite::Result<()> {
    let started_at = Instant::now();
    let result = apply_pragmas(conn, use_wal, options);
    match &result {
        Ok(()) => debug!(
            "event=db_open module=db status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={} error_code=db_configure_failed error={}",
            mode,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn apply_pragmas(
    conn: &Connection,
    use_wal: bool,
    options: ConnectionOptions,
) -> rusqlite::Result<()> {
    conn.busy_timeout(options.busy_timeout)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    if use_wal {
        // journal_mode returns the resulting mode as a row.
        conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get::<_, String>(0))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{open_connection, ConnectionOptions};
    use crate::db::StorageTarget;

    #[test]
    fn memory_connections_with_same_name_share_data() {
        let target = StorageTarget::memory();
        let first = open_connection(&target, ConnectionOptions::default()).unwrap();
        first
            .execute_batch("CREATE TABLE probe (value INTEGER); INSERT INTO probe VALUES (7);")
            .unwrap();

        let second = open_connection(&target, ConnectionOptions::default()).unwrap();
        let value: i64 = second
            .query_row("SELECT value FROM probe;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn file_connections_use_wal_journal() {
        let dir = tempfile::tempdir().unwrap();
        let target = StorageTarget::File(dir.path().join("contacts.db"));
        let conn = open_connection(&target, ConnectionOptions::default()).unwrap();

        let mode: String = conn
            .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_ascii_lowercase(), "wal");
    }
}

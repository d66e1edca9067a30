//! SQLite storage bootstrap, connection pooling and the schema guard.
//!
//! # Responsibility
//! - Resolve the configured storage target and open configured connections.
//! - Own the process-wide connection pool shared by every invocation.
//! - Provide the idempotent `contacts` schema guard.
//!
//! # Invariants
//! - Core code must not read/write contacts before the schema guard succeeds
//!   on the connection in use.
//! - Connections checked out of the pool are always returned on drop.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;
pub mod pool;
pub mod schema;

pub use open::{open_connection, ConnectionOptions};
pub use pool::{ConnectionPool, PoolConfig, PoolError, PoolStatus, PooledConnection};
pub use schema::ensure_contacts_table;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Where contact data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    /// A database file on disk.
    File(PathBuf),
    /// A named shared-cache in-memory database.
    ///
    /// Every connection opened with the same name sees the same data for as
    /// long as at least one of them stays open.
    Memory { name: String },
}

impl StorageTarget {
    /// Resolves a connection string into a storage target.
    ///
    /// Accepted forms:
    /// - `:memory:` and `sqlite::memory:` -> fresh uniquely named memory database
    /// - `sqlite://<path>` and `file:<path>` -> file database at `<path>`
    /// - anything else -> file database at the given path
    pub fn parse(database_url: &str) -> Self {
        let trimmed = database_url.trim();
        match trimmed {
            ":memory:" | "sqlite::memory:" => Self::memory(),
            _ => {
                let path = trimmed
                    .strip_prefix("sqlite://")
                    .or_else(|| trimmed.strip_prefix("file:"))
                    .unwrap_or(trimmed);
                Self::File(PathBuf::from(path))
            }
        }
    }

    /// Creates a memory target with a process-unique name.
    pub fn memory() -> Self {
        Self::Memory {
            name: format!("contactbook-{}", uuid::Uuid::new_v4().simple()),
        }
    }

    /// Short label used in log events.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory { .. } => "memory",
        }
    }
}

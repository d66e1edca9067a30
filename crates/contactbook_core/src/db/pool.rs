//! Bounded, process-wide SQLite connection pool.
//!
//! # Responsibility
//! - Hand out configured connections to invocations and take them back.
//! - Bound the number of simultaneously open connections.
//! - Provide explicit teardown via [`ConnectionPool::close`].
//!
//! # Invariants
//! - A [`PooledConnection`] returns its connection to the pool when dropped,
//!   on every exit path of the borrowing code.
//! - A memory target is served by exactly one connection; shared-cache table
//!   locks are not retried by the busy timeout.
//! - After `close`, checkouts fail with [`PoolError::Closed`].

use super::open::{connection_manager, ConnectionOptions};
use super::StorageTarget;
use log::{info, warn};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

pub type PoolResult<T> = Result<T, PoolError>;

/// A connection checked out of a [`ConnectionPool`].
///
/// Dereferences to [`rusqlite::Connection`]; returns it to the pool on drop.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Failure to build the pool or check out a connection.
#[derive(Debug)]
pub enum PoolError {
    /// The pool has been torn down.
    Closed,
    /// No connection became available within the acquire timeout.
    Timeout(Duration),
    /// The initial connections could not be opened.
    Build(r2d2::Error),
    /// The pool configuration cannot produce any connection.
    InvalidConfig(&'static str),
}

impl Display for PoolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "connection pool is closed"),
            Self::Timeout(waited) => write!(
                f,
                "no connection available after {} ms",
                waited.as_millis()
            ),
            Self::Build(err) => write!(f, "failed to open connection pool: {err}"),
            Self::InvalidConfig(details) => write!(f, "invalid pool config: {details}"),
        }
    }
}

impl Error for PoolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Build(err) => Some(err),
            _ => None,
        }
    }
}

/// Pool construction settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub target: StorageTarget,
    pub max_connections: usize,
    pub acquire_timeout: Duration,
    pub connection: ConnectionOptions,
}

impl PoolConfig {
    /// Creates a config for `target` with default sizing.
    pub fn new(target: StorageTarget) -> Self {
        Self {
            target,
            max_connections: 4,
            acquire_timeout: Duration::from_secs(5),
            connection: ConnectionOptions::default(),
        }
    }

    /// Connection bound actually applied to the target.
    pub fn effective_max_connections(&self) -> usize {
        match self.target {
            StorageTarget::File(_) => self.max_connections,
            StorageTarget::Memory { .. } => self.max_connections.min(1),
        }
    }
}

/// Point-in-time pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub idle: usize,
    pub in_use: usize,
    pub max_connections: usize,
    pub closed: bool,
}

/// Shared pool of SQLite connections.
///
/// `ConnectionPool` is `Sync`; share it behind an `Arc` across threads.
pub struct ConnectionPool {
    config: PoolConfig,
    pool: RwLock<Option<Pool<SqliteConnectionManager>>>,
}

impl ConnectionPool {
    /// Opens every pooled connection up front.
    ///
    /// # Errors
    /// - `InvalidConfig` when `max_connections` or `acquire_timeout` is zero.
    /// - `Build` when the target cannot be opened.
    pub fn open(config: PoolConfig) -> PoolResult<Self> {
        if config.max_connections == 0 {
            return Err(PoolError::InvalidConfig("max_connections must be > 0"));
        }
        if config.acquire_timeout.is_zero() {
            return Err(PoolError::InvalidConfig("acquire_timeout must be > 0"));
        }
        let max_size = u32::try_from(config.effective_max_connections())
            .map_err(|_| PoolError::InvalidConfig("max_connections is too large"))?;

        let builder = Pool::builder()
            .max_size(max_size)
            .connection_timeout(config.acquire_timeout);
        // The memory database lives only while its connection stays open.
        let builder = match config.target {
            StorageTarget::File(_) => builder,
            StorageTarget::Memory { .. } => builder.idle_timeout(None).max_lifetime(None),
        };
        let pool = builder
            .build(connection_manager(&config.target, config.connection))
            .map_err(PoolError::Build)?;

        info!(
            "event=pool_open module=db status=ok mode={} max_connections={}",
            config.target.mode(),
            max_size
        );

        Ok(Self {
            config,
            pool: RwLock::new(Some(pool)),
        })
    }

    /// Checks out a connection.
    ///
    /// Blocks up to the configured acquire timeout when every connection is
    /// in use.
    pub fn acquire(&self) -> PoolResult<PooledConnection> {
        let pool = self.read_pool().clone().ok_or(PoolError::Closed)?;
        pool.get().map_err(|err| {
            warn!(
                "event=pool_acquire module=db status=error error_code=pool_timeout max_connections={} error={}",
                pool.max_size(),
                err
            );
            PoolError::Timeout(self.config.acquire_timeout)
        })
    }

    /// Tears the pool down.
    ///
    /// Idle connections are closed once no checkout still holds the pool;
    /// connections still checked out close when their guards drop. Repeated
    /// calls are no-ops.
    pub fn close(&self) {
        let Some(pool) = self.write_pool().take() else {
            return;
        };
        let state = pool.state();
        drop(pool);

        info!(
            "event=pool_close module=db status=ok mode={} in_use={}",
            self.config.target.mode(),
            state.connections - state.idle_connections
        );
    }

    /// Returns current occupancy counters.
    pub fn status(&self) -> PoolStatus {
        match self.read_pool().as_ref() {
            Some(pool) => {
                let state = pool.state();
                PoolStatus {
                    idle: state.idle_connections as usize,
                    in_use: (state.connections - state.idle_connections) as usize,
                    max_connections: pool.max_size() as usize,
                    closed: false,
                }
            }
            None => PoolStatus {
                idle: 0,
                in_use: 0,
                max_connections: self.config.effective_max_connections(),
                closed: true,
            },
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    fn read_pool(&self) -> RwLockReadGuard<'_, Option<Pool<SqliteConnectionManager>>> {
        self.pool.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_pool(&self) -> RwLockWriteGuard<'_, Option<Pool<SqliteConnectionManager>>> {
        self.pool.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ConnectionPool {
    fn drop(&mut self) {
        self.close();
    }
}

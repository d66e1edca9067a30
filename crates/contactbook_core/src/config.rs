//! Service configuration from injected environment values.
//!
//! # Responsibility
//! - Read storage, pool, pagination and logging settings.
//! - Reject unusable values before any connection is opened.
//!
//! # Invariants
//! - `DATABASE_URL` is required; every other value has a default.
//! - `0 < default_limit <= max_limit` and `max_connections > 0`.

use crate::db::{ConnectionOptions, PoolConfig, StorageTarget};
use crate::logging::default_log_level;
use crate::service::contact_service::PaginationConfig;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_PAGE_SIZE: &str = "CONTACTS_PAGE_SIZE";
pub const ENV_MAX_PAGE_SIZE: &str = "CONTACTS_MAX_PAGE_SIZE";
pub const ENV_POOL_SIZE: &str = "CONTACTS_POOL_SIZE";
pub const ENV_POOL_ACQUIRE_TIMEOUT_MS: &str = "CONTACTS_POOL_ACQUIRE_TIMEOUT_MS";
pub const ENV_BUSY_TIMEOUT_MS: &str = "CONTACTS_BUSY_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "CONTACTS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CONTACTS_LOG_DIR";

const DEFAULT_POOL_SIZE: usize = 4;
const DEFAULT_ACQUIRE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    InvalidNumber { key: &'static str, value: String },
    Invalid { key: &'static str, reason: &'static str },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required setting `{key}`"),
            Self::InvalidNumber { key, value } => {
                write!(f, "setting `{key}` must be a non-negative integer, got `{value}`")
            }
            Self::Invalid { key, reason } => write!(f, "invalid setting `{key}`: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub database_url: String,
    pub pagination: PaginationConfig,
    pub max_connections: usize,
    pub acquire_timeout: Duration,
    pub busy_timeout: Duration,
    pub log_level: String,
    /// Absolute log directory; `None` logs to stderr.
    pub log_dir: Option<String>,
}

impl ServiceConfig {
    /// Defaults around an explicit connection string.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pagination: PaginationConfig::default(),
            max_connections: DEFAULT_POOL_SIZE,
            acquire_timeout: Duration::from_millis(DEFAULT_ACQUIRE_TIMEOUT_MS),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }

    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let database_url = read(ENV_DATABASE_URL).ok_or(ConfigError::Missing(ENV_DATABASE_URL))?;
        let mut config = Self::new(database_url);

        if let Some(value) = read(ENV_PAGE_SIZE) {
            config.pagination.default_limit = parse_number(ENV_PAGE_SIZE, &value)?;
        }
        if let Some(value) = read(ENV_MAX_PAGE_SIZE) {
            config.pagination.max_limit = parse_number(ENV_MAX_PAGE_SIZE, &value)?;
        }
        if let Some(value) = read(ENV_POOL_SIZE) {
            config.max_connections = parse_number(ENV_POOL_SIZE, &value)?;
        }
        if let Some(value) = read(ENV_POOL_ACQUIRE_TIMEOUT_MS) {
            config.acquire_timeout =
                Duration::from_millis(parse_number(ENV_POOL_ACQUIRE_TIMEOUT_MS, &value)?);
        }
        if let Some(value) = read(ENV_BUSY_TIMEOUT_MS) {
            config.busy_timeout = Duration::from_millis(parse_number(ENV_BUSY_TIMEOUT_MS, &value)?);
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = value;
        }
        config.log_dir = read(ENV_LOG_DIR);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.default_limit == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_PAGE_SIZE,
                reason: "must be greater than zero",
            });
        }
        if self.pagination.max_limit < self.pagination.default_limit {
            return Err(ConfigError::Invalid {
                key: ENV_MAX_PAGE_SIZE,
                reason: "must not be smaller than the default page size",
            });
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_POOL_SIZE,
                reason: "must be greater than zero",
            });
        }
        if self.acquire_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: ENV_POOL_ACQUIRE_TIMEOUT_MS,
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    pub fn storage_target(&self) -> StorageTarget {
        StorageTarget::parse(&self.database_url)
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            target: self.storage_target(),
            max_connections: self.max_connections,
            acquire_timeout: self.acquire_timeout,
            connection: ConnectionOptions {
                busy_timeout: self.busy_timeout,
            },
        }
    }
}

fn parse_number<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: value.to_string(),
    })
}

//! Process logger bootstrap.
//!
//! # Invariants
//! - The logger starts at most once per process; a repeated call with the
//!   same level and target is a no-op, a different one is rejected.
//! - Contact field values (name, email, phone) are never logged.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

const LOG_FILE_BASENAME: &str = "contactbook";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Size-rotated files under this directory.
    Directory(PathBuf),
}

impl LogTarget {
    fn from_dir(log_dir: Option<&str>) -> Self {
        match log_dir.map(str::trim).filter(|dir| !dir.is_empty()) {
            Some(dir) => Self::Directory(PathBuf::from(dir)),
            None => Self::Stderr,
        }
    }
}

impl Display for LogTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => write!(f, "stderr"),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

#[derive(Debug)]
pub enum LoggingError {
    InvalidLevel(String),
    AlreadyStarted {
        level: LevelFilter,
        target: LogTarget,
    },
    Backend(String),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLevel(raw) => write!(
                f,
                "unsupported log level `{raw}`; expected off|error|warn|info|debug|trace"
            ),
            Self::AlreadyStarted { level, target } => write!(
                f,
                "logging already started with level `{level}` at `{target}`"
            ),
            Self::Backend(details) => write!(f, "failed to start logger: {details}"),
        }
    }
}

impl Error for LoggingError {}

struct ActiveLogger {
    level: LevelFilter,
    target: LogTarget,
    _handle: LoggerHandle,
}

/// Starts the process logger; `log_dir = None` (or blank) logs to stderr.
///
/// # Errors
/// - `InvalidLevel` when `level` is not a `log` level name.
/// - `AlreadyStarted` when a logger with another level or target is running.
/// - `Backend` when the log directory or the logger cannot be set up.
pub fn init_logging(level: &str, log_dir: Option<&str>) -> Result<(), LoggingError> {
    let level = LevelFilter::from_str(level.trim())
        .map_err(|_| LoggingError::InvalidLevel(level.to_string()))?;
    let target = LogTarget::from_dir(log_dir);

    let active = ACTIVE_LOGGER.get_or_try_init(|| {
        let handle = start_logger(level, &target)?;
        info!(
            "event=logging_init module=core status=ok level={} target={} version={}",
            level,
            target,
            env!("CARGO_PKG_VERSION")
        );
        Ok::<_, LoggingError>(ActiveLogger {
            level,
            target: target.clone(),
            _handle: handle,
        })
    })?;

    if active.level != level || active.target != target {
        return Err(LoggingError::AlreadyStarted {
            level: active.level,
            target: active.target.clone(),
        });
    }
    Ok(())
}

/// Returns `(level, target)` of the running logger.
pub fn logging_status() -> Option<(LevelFilter, LogTarget)> {
    ACTIVE_LOGGER
        .get()
        .map(|active| (active.level, active.target.clone()))
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: LevelFilter, target: &LogTarget) -> Result<LoggerHandle, LoggingError> {
    let logger = Logger::with(LogSpecification::builder().default(level).build());
    let logger = match target {
        LogTarget::Stderr => logger.log_to_stderr().format(flexi_logger::detailed_format),
        LogTarget::Directory(dir) => {
            std::fs::create_dir_all(dir).map_err(|err| {
                LoggingError::Backend(format!("cannot create `{}`: {err}", dir.display()))
            })?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir.as_path())
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
        }
    };
    logger
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))
}

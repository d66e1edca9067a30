//! Core domain logic for the contact book service.
//! This crate is the single source of truth for contact storage, pagination
//! and the invocation contract served to the browser client.

pub mod config;
pub mod db;
pub mod handler;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, ServiceConfig};
pub use db::{ConnectionPool, PoolConfig, PoolError, StorageTarget};
pub use handler::error::InvocationError;
pub use handler::request::{InvocationRequest, InvocationResponse, Method};
pub use handler::ContactDirectory;
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::contact::{Contact, ContactId, ContactValidationError, NewContact};
pub use repo::contact_repo::{
    ContactPageQuery, ContactRepository, ContactSlice, RepoError, RepoResult,
    SqliteContactRepository,
};
pub use service::contact_service::{
    ContactPage, ContactService, PageRequest, PaginationConfig, ServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Invocation-boundary error taxonomy.
//!
//! # Invariants
//! - Every variant maps to exactly one status and a `{"error": message}` body.
//! - Infrastructure details never reach the response body; they are logged.

use super::request::{
    InvocationResponse, STATUS_BAD_REQUEST, STATUS_INTERNAL_ERROR, STATUS_NOT_FOUND,
    STATUS_UNAVAILABLE,
};
use crate::db::{DbError, PoolError};
use crate::model::contact::{ContactId, ContactValidationError};
use crate::repo::contact_repo::RepoError;
use crate::service::contact_service::ServiceError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum InvocationError {
    /// Body absent or not parseable into the expected shape.
    MalformedBody(String),
    /// Create payload failed shape rules.
    Validation(ContactValidationError),
    /// Delete request carried no usable id.
    MissingContactId,
    /// Delete id present but not an integer.
    InvalidContactId(String),
    NotFound(ContactId),
    Pool(PoolError),
    Db(DbError),
    Repo(RepoError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl InvocationError {
    pub fn status(&self) -> u16 {
        match self {
            Self::MalformedBody(_)
            | Self::Validation(_)
            | Self::MissingContactId
            | Self::InvalidContactId(_) => STATUS_BAD_REQUEST,
            Self::NotFound(_) => STATUS_NOT_FOUND,
            Self::Pool(PoolError::Closed | PoolError::Timeout(_)) => STATUS_UNAVAILABLE,
            Self::Pool(_) | Self::Db(_) | Self::Repo(_) => STATUS_INTERNAL_ERROR,
        }
    }

    /// Stable code for log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedBody(_) => "malformed_body",
            Self::Validation(_) => "validation_failed",
            Self::MissingContactId => "missing_contact_id",
            Self::InvalidContactId(_) => "invalid_contact_id",
            Self::NotFound(_) => "contact_not_found",
            Self::Pool(PoolError::Closed | PoolError::Timeout(_)) => "storage_unavailable",
            Self::Pool(_) => "pool_error",
            Self::Db(_) => "schema_guard_failed",
            Self::Repo(_) => "storage_error",
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status() < STATUS_INTERNAL_ERROR
    }

    /// Message placed in the response body.
    fn public_message(&self) -> String {
        match self {
            Self::MalformedBody(details) => format!("Invalid request body: {details}"),
            Self::Validation(err) => err.to_string(),
            Self::MissingContactId => "Contact ID required for deletion".to_string(),
            Self::InvalidContactId(raw) => format!("Invalid contact ID: {raw}"),
            Self::NotFound(_) => "Contact not found".to_string(),
            Self::Pool(PoolError::Closed | PoolError::Timeout(_)) => {
                "Storage unavailable".to_string()
            }
            Self::Pool(_) | Self::Db(_) | Self::Repo(_) => "Internal storage error".to_string(),
        }
    }

    pub fn into_response(self) -> InvocationResponse {
        let message = self.public_message();
        InvocationResponse::json(self.status(), &ErrorBody { error: &message })
    }
}

impl Display for InvocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedBody(details) => write!(f, "malformed request body: {details}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::MissingContactId => write!(f, "contact id required for deletion"),
            Self::InvalidContactId(raw) => write!(f, "invalid contact id `{raw}`"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::Pool(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for InvocationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Pool(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PoolError> for InvocationError {
    fn from(value: PoolError) -> Self {
        Self::Pool(value)
    }
}

impl From<DbError> for InvocationError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<ServiceError> for InvocationError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(err) => Self::Validation(err),
            ServiceError::NotFound(id) => Self::NotFound(id),
            ServiceError::Repo(err) => Self::Repo(err),
        }
    }
}

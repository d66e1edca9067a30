//! Contact use-case service.
//!
//! # Responsibility
//! - Provide create/list/delete entry points for the invocation handler.
//! - Normalize raw pagination input and derive `has_next_page`.
//!
//! # Invariants
//! - `page >= 1` and `1 <= limit <= max_limit` after normalization.
//! - `offset = (page - 1) * limit`.
//! - `has_next_page` is `page * limit < total_count` at read time.

use crate::model::contact::{Contact, ContactId, ContactValidationError, NewContact};
use crate::repo::contact_repo::{ContactPageQuery, ContactRepository, RepoError};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for contact use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Create payload failed shape rules.
    Validation(ContactValidationError),
    /// Target contact does not exist.
    NotFound(ContactId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Page size policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// `limit` used when the request omits it or sends a non-positive value.
    pub default_limit: u32,
    /// Upper clamp for requested `limit`.
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_SIZE,
            max_limit: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

/// Normalized page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Builds a page request from raw query parameter values.
    ///
    /// Absent, non-numeric, zero and negative values fall back to page 1 and
    /// `config.default_limit`; `limit` is clamped to `config.max_limit`.
    pub fn from_params(page: Option<&str>, limit: Option<&str>, config: &PaginationConfig) -> Self {
        let page = page.and_then(parse_positive_int).unwrap_or(1);
        let limit = limit
            .and_then(parse_positive_int)
            .unwrap_or(config.default_limit)
            .min(config.max_limit.max(1));
        Self { page, limit }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Whether rows remain after this page for a relation of `total_count`.
    pub fn has_next_page(&self, total_count: u64) -> bool {
        u64::from(self.page) * u64::from(self.limit) < total_count
    }

    fn query(&self) -> ContactPageQuery {
        ContactPageQuery {
            limit: self.limit,
            offset: self.offset(),
        }
    }
}

/// Leading-integer parse: `" 12abc"` -> 12, `"abc"` -> none, `"-3"` -> none.
///
/// Values above `u32::MAX` saturate.
pub fn parse_positive_int(raw: &str) -> Option<u32> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digit_len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if digit_len == 0 || negative {
        return None;
    }

    let value = digits[..digit_len]
        .bytes()
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10)
                .saturating_add(u64::from(digit - b'0'))
        })
        .min(u64::from(u32::MAX));
    match u32::try_from(value) {
        Ok(0) | Err(_) => None,
        Ok(value) => Some(value),
    }
}

/// One page of contacts, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPage {
    pub contacts: Vec<Contact>,
    pub has_next_page: bool,
}

/// Use-case service wrapper for contact operations.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Inserts a contact and returns the stored row with its generated id.
    pub fn create_contact(&self, contact: &NewContact) -> ServiceResult<Contact> {
        Ok(self.repo.create_contact(contact)?)
    }

    /// Reads one page ordered by `id DESC` and derives `has_next_page`.
    pub fn list_contacts(&self, request: &PageRequest) -> ServiceResult<ContactPage> {
        let slice = self.repo.list_contacts(&request.query())?;
        Ok(ContactPage {
            has_next_page: request.has_next_page(slice.total_count),
            contacts: slice.contacts,
        })
    }

    /// Deletes a contact and returns the removed row.
    pub fn delete_contact(&self, id: ContactId) -> ServiceResult<Contact> {
        Ok(self.repo.delete_contact(id)?)
    }
}

//! Contact domain model.
//!
//! # Responsibility
//! - Define the stored contact row and the create payload.
//! - Validate the create payload before it reaches storage.
//!
//! # Invariants
//! - `id` is assigned by storage exactly once and never reused.
//! - `name` is non-empty; `email` and `phone` are free-form and optional.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned contact identifier.
pub type ContactId = i64;

/// A persisted contact row.
///
/// Serializes as `{"id", "name", "email", "phone"}` with `null` for absent
/// optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Create payload parsed from a request body.
///
/// Unknown fields (including a client-supplied `id`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewContact {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl NewContact {
    /// Creates a payload with only `name` set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Checks the payload shape rules enforced before insert.
    ///
    /// No format rules apply to `email` or `phone`.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.name.trim().is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        Ok(())
    }
}

/// Shape violation on a create payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactValidationError {
    EmptyName,
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Contact name is required"),
        }
    }
}

impl Error for ContactValidationError {}

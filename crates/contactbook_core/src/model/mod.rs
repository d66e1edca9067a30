//! Contact directory domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and its creation payload.
//! - Keep the JSON wire shape of contacts in one place.
//!
//! # Invariants
//! - Every stored contact is identified by a storage-assigned `ContactId`.
//! - Deletion is permanent; there is no tombstone and no update path.

pub mod contact;

//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own pagination semantics so the handler stays transport-only.

pub mod contact_service;

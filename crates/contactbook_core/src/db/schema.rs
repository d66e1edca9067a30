//! Idempotent schema guard for the `contacts` relation.
//!
//! # Invariants
//! - `AUTOINCREMENT` keeps ids monotonic and never reuses a deleted id.
//! - Running the guard against an existing relation is a no-op.

use crate::db::DbResult;
use rusqlite::Connection;

const CONTACTS_SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the `contacts` relation when it does not exist yet.
///
/// Safe to run on every invocation.
pub fn ensure_contacts_table(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CONTACTS_SCHEMA_SQL)?;
    Ok(())
}

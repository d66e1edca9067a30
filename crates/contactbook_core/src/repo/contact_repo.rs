//! Contact repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/delete APIs over the `contacts` relation.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `NewContact::validate()` before SQL mutations.
//! - Inserts and deletes are single `... RETURNING` statements.
//! - Page rows and total count are read in the same read transaction.
//! - Listing is always ordered by `id DESC`.

use crate::db::DbError;
use crate::model::contact::{Contact, ContactId, ContactValidationError, NewContact};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACT_COLUMNS: &str = "id, name, email, phone";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ContactValidationError),
    Db(DbError),
    NotFound(ContactId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Window of rows to read, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPageQuery {
    pub limit: u32,
    pub offset: u64,
}

/// One window of contacts plus the relation size it was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSlice {
    pub contacts: Vec<Contact>,
    pub total_count: u64,
}

/// Repository interface for contact operations.
pub trait ContactRepository {
    fn create_contact(&self, contact: &NewContact) -> RepoResult<Contact>;
    /// Reads one window and the total row count from a single snapshot.
    fn list_contacts(&self, query: &ContactPageQuery) -> RepoResult<ContactSlice>;
    /// Deletes and returns one contact; `NotFound` when no row matched.
    fn delete_contact(&self, id: ContactId) -> RepoResult<Contact>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn create_contact(&self, contact: &NewContact) -> RepoResult<Contact> {
        contact.validate()?;

        let mut stmt = self.conn.prepare_cached(&format!(
            "INSERT INTO contacts (name, email, phone)
             VALUES (?1, ?2, ?3)
             RETURNING {CONTACT_COLUMNS};"
        ))?;
        let created = stmt.query_row(
            params![
                contact.name.as_str(),
                contact.email.as_deref(),
                contact.phone.as_deref(),
            ],
            parse_contact_row,
        )?;

        Ok(created)
    }

    fn list_contacts(&self, query: &ContactPageQuery) -> RepoResult<ContactSlice> {
        let tx = self.conn.unchecked_transaction()?;

        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);
        let contacts = {
            let mut stmt = tx.prepare_cached(&format!(
                "SELECT {CONTACT_COLUMNS}
                 FROM contacts
                 ORDER BY id DESC
                 LIMIT ?1 OFFSET ?2;"
            ))?;
            let rows = stmt.query_map(params![i64::from(query.limit), offset], parse_contact_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        let total_count = count_rows(&tx)?;

        tx.commit()?;
        Ok(ContactSlice {
            contacts,
            total_count,
        })
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<Contact> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "DELETE FROM contacts
             WHERE id = ?1
             RETURNING {CONTACT_COLUMNS};"
        ))?;
        stmt.query_row([id], parse_contact_row)
            .optional()?
            .ok_or(RepoError::NotFound(id))
    }
}

fn count_rows(conn: &Connection) -> RepoResult<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))?;
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative contact count `{count}`")))
}

fn parse_contact_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
    })
}

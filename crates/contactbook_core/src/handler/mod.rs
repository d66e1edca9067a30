//! Contact directory invocation handler.
//!
//! # Responsibility
//! - Run one invocation: check out a connection, guard the schema, dispatch
//!   on method, map the outcome to a status and body.
//! - Log one `contacts_invoke` event per invocation with a request id.
//!
//! # Invariants
//! - The pooled connection is released on every exit path, 405 included.
//! - The schema guard runs before any contact query in an invocation.
//! - A delete with a missing id never issues a delete statement.
//! - The handler holds no request state between invocations.

mod delete_id;
pub mod error;
pub mod request;

use crate::config::ServiceConfig;
use crate::db::{ensure_contacts_table, ConnectionPool, PoolError};
use crate::model::contact::{Contact, NewContact};
use crate::repo::contact_repo::SqliteContactRepository;
use crate::service::contact_service::{ContactService, PageRequest, PaginationConfig};
use delete_id::resolve_delete_id;
use error::InvocationError;
use log::{error, info};
use request::{InvocationRequest, InvocationResponse, Method, STATUS_OK};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Confirmation body for a successful delete.
#[derive(Debug, Serialize)]
struct DeleteConfirmation {
    success: bool,
    deleted: Contact,
}

/// Process-wide entry point for contact invocations.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ContactDirectory {
    pool: Arc<ConnectionPool>,
    pagination: PaginationConfig,
}

impl ContactDirectory {
    pub fn new(pool: Arc<ConnectionPool>, pagination: PaginationConfig) -> Self {
        Self { pool, pagination }
    }

    /// Opens the connection pool described by `config`.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, PoolError> {
        let pool = ConnectionPool::open(config.pool_config())?;
        Ok(Self::new(Arc::new(pool), config.pagination))
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn pagination(&self) -> PaginationConfig {
        self.pagination
    }

    /// Closes the shared pool; later invocations answer 503.
    pub fn shutdown(&self) {
        self.pool.close();
    }

    /// Handles one invocation end to end.
    ///
    /// Never panics on bad input; every failure becomes a response.
    pub fn handle(&self, request: &InvocationRequest) -> InvocationResponse {
        let request_id = Uuid::new_v4();
        let started_at = Instant::now();

        match self.dispatch(request) {
            Ok(response) => {
                info!(
                    "event=contacts_invoke module=handler status=ok request_id={} method={} status_code={} duration_ms={}",
                    request_id,
                    request.method,
                    response.status,
                    started_at.elapsed().as_millis()
                );
                response
            }
            Err(err) => {
                if err.is_client_error() {
                    info!(
                        "event=contacts_invoke module=handler status=rejected request_id={} method={} status_code={} duration_ms={} error_code={}",
                        request_id,
                        request.method,
                        err.status(),
                        started_at.elapsed().as_millis(),
                        err.error_code()
                    );
                } else {
                    error!(
                        "event=contacts_invoke module=handler status=error request_id={} method={} status_code={} duration_ms={} error_code={} error={}",
                        request_id,
                        request.method,
                        err.status(),
                        started_at.elapsed().as_millis(),
                        err.error_code(),
                        err
                    );
                }
                err.into_response()
            }
        }
    }

    fn dispatch(&self, request: &InvocationRequest) -> Result<InvocationResponse, InvocationError> {
        let conn = self.pool.acquire()?;
        ensure_contacts_table(&conn)?;
        let service = ContactService::new(SqliteContactRepository::new(&conn));

        match &request.method {
            Method::Post => {
                let payload = parse_new_contact(request.body_text())?;
                let created = service.create_contact(&payload)?;
                Ok(InvocationResponse::json(STATUS_OK, &created))
            }
            Method::Get => {
                let page = PageRequest::from_params(
                    request.query_param("page"),
                    request.query_param("limit"),
                    &self.pagination,
                );
                let listed = service.list_contacts(&page)?;
                Ok(InvocationResponse::json(STATUS_OK, &listed))
            }
            Method::Delete => {
                let id = resolve_delete_id(request.body_text(), &request.path)?;
                let deleted = service.delete_contact(id)?;
                Ok(InvocationResponse::json(
                    STATUS_OK,
                    &DeleteConfirmation {
                        success: true,
                        deleted,
                    },
                ))
            }
            Method::Other(_) => Ok(InvocationResponse::method_not_allowed()),
        }
    }
}

fn parse_new_contact(body: Option<&str>) -> Result<NewContact, InvocationError> {
    let body =
        body.ok_or_else(|| InvocationError::MalformedBody("missing request body".to_string()))?;
    serde_json::from_str(body).map_err(|err| InvocationError::MalformedBody(err.to_string()))
}

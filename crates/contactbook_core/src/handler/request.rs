//! Transport-neutral invocation envelopes.
//!
//! The front door (CLI, HTTP adapter, serverless shim) turns each inbound call
//! into an [`InvocationRequest`] and writes back the [`InvocationResponse`].

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_METHOD_NOT_ALLOWED: u16 = 405;
pub const STATUS_INTERNAL_ERROR: u16 = 500;
pub const STATUS_UNAVAILABLE: u16 = 503;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

const SERIALIZE_FAILURE_BODY: &str = r#"{"error":"Internal storage error"}"#;

/// Request method, matched case-sensitively like HTTP methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
    Other(String),
}

impl Method {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "DELETE" => Self::Delete,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<&str> for Method {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub method: Method,
    /// Request path; its trailing segment may carry a delete id.
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl InvocationRequest {
    pub fn new(method: impl Into<Method>) -> Self {
        Self {
            method: method.into(),
            path: "/contacts".to_string(),
            query: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    pub fn post(body: impl Into<String>) -> Self {
        Self::new(Method::Post).with_body(body)
    }

    pub fn delete(body: impl Into<String>) -> Self {
        Self::new(Method::Delete).with_body(body)
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Body text, or `None` when absent or blank.
    pub fn body_text(&self) -> Option<&str> {
        self.body.as_deref().filter(|body| !body.trim().is_empty())
    }
}

/// Structured result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl InvocationResponse {
    /// JSON response; falls back to a 500 error body if `value` cannot be
    /// serialized.
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status,
                content_type: CONTENT_TYPE_JSON,
                body,
            },
            Err(_) => Self {
                status: STATUS_INTERNAL_ERROR,
                content_type: CONTENT_TYPE_JSON,
                body: SERIALIZE_FAILURE_BODY.to_string(),
            },
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: CONTENT_TYPE_TEXT,
            body: body.into(),
        }
    }

    pub fn method_not_allowed() -> Self {
        Self::text(STATUS_METHOD_NOT_ALLOWED, "Method Not Allowed")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

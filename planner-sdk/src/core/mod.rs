//! Core abstractions for the planner SDK
//!
//! This module provides the seams between the screens and the network:
//!
//! - `HttpTransport`: the fetch-like collaborator that performs one request
//! - `HttpRequest` / `HttpResponse`: transport-neutral request and raw response
//! - `ServiceClient`: identity and health of a concrete client
//! - `Telemetry`: per-endpoint request accounting
//! - `ClientBuilder`: builder for the reqwest-backed transport

pub mod builder;
pub use builder::ClientBuilder;

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// HTTP verbs used by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// A file attached to a multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name
    pub field: String,

    /// File name reported to the server
    pub file_name: String,

    /// MIME type, if known
    pub content_type: Option<String>,

    /// File contents
    pub bytes: Vec<u8>,
}

/// Multipart form payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartBody {
    /// Plain text fields, in insertion order
    pub fields: Vec<(String, String)>,

    /// Attached files
    pub files: Vec<FilePart>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Attach a file
    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }
}

/// Request body variants
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartBody),
}

/// A single request against the planner backend
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method
    pub method: HttpMethod,

    /// Path relative to the base URL, e.g. `api/roadmap`
    pub endpoint: String,

    /// Query parameters, unencoded; the transport encodes them
    pub query: Vec<(String, String)>,

    /// Request body
    pub body: RequestBody,
}

impl HttpRequest {
    /// A GET request without body
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// A POST request with a JSON body
    pub fn post_json<T: Serialize + ?Sized>(endpoint: impl Into<String>, body: &T) -> Result<Self> {
        Ok(Self {
            method: HttpMethod::Post,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: RequestBody::Json(serde_json::to_value(body)?),
        })
    }

    /// A POST request with a multipart body
    pub fn post_multipart(endpoint: impl Into<String>, form: MultipartBody) -> Self {
        Self {
            method: HttpMethod::Post,
            endpoint: endpoint.into(),
            query: Vec::new(),
            body: RequestBody::Multipart(form),
        }
    }

    /// Append a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Look up a query parameter by name
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response handed back by a transport
///
/// The body is kept as text; deciding whether it is usable JSON belongs to the
/// request session, not the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// `Content-Type` header, if any
    pub content_type: Option<String>,

    /// Body text (possibly empty)
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    /// A response carrying the given JSON value
    pub fn json(status: u16, value: &Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: value.to_string(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The fetch-like collaborator every screen dispatches through
///
/// An implementation performs exactly one attempt per call. Non-2xx statuses
/// are returned as `Ok(HttpResponse)`; `Err` is reserved for requests that
/// produced no response at all.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform the request
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Base trait for concrete service clients
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// The client name/identifier
    fn name(&self) -> &str;

    /// The base URL requests are resolved against
    fn base_url(&self) -> &str;

    /// Service version
    fn version(&self) -> &str;

    /// Health check for the service
    async fn health_check(&self) -> Result<bool>;

    /// Returns the client's metrics and telemetry if available
    fn metrics(&self) -> Option<HashMap<String, String>>;
}

/// Trait for clients that support telemetry
pub trait Telemetry: Send + Sync {
    /// Record a completed request with timing
    fn record_request(&self, endpoint: &str, status: u16, duration: Duration);

    /// Record an error event
    fn record_error(&self, endpoint: &str, error: &str);

    /// Get current metrics
    fn metrics(&self) -> HashMap<String, String>;

    /// Reset metrics
    fn reset_metrics(&self);
}

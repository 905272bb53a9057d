//! Error handling for the planner SDK
//!
//! This module provides the error system shared by every screen:
//! - Categorizes errors by where they arise (input validation, transport,
//!   response normalization, configuration, export)
//! - Adds context to errors (HTTP status, endpoint, body snippet)
//! - Flattens any error into the `ErrorInfo` shape the presentation layer renders
//! - Provides a convenient Result type alias

use std::fmt;
use std::collections::HashMap;
use serde::Serialize;
use thiserror::Error;

use crate::util::truncate_string;

pub mod mapping;

/// Result type for planner SDK operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Maximum number of characters of a response body kept in error reports
pub const BODY_SNIPPET_LIMIT: usize = 200;

/// Main error type for the planner SDK
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Required input missing or empty; never reaches the network
    #[error("Validation error: {0}")]
    Validation(String),

    /// Non-2xx status, or a 2xx response whose body is empty or not JSON
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request never produced a response (connect, DNS, TLS...)
    #[error("Network error: {0}")]
    Network(String),

    /// Well-formed JSON that lacks a field the screen cannot render without
    #[error("Normalization error: {0}")]
    Normalization(String),

    /// The auth gate is closed
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Clipboard or download failures
    #[error("Export error: {0}")]
    Export(String),

    /// Unexpected or internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// Errors with additional context
    #[error("{inner}")]
    WithContext {
        inner: Box<ServiceError>,
        context: ErrorContext,
    },
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        ServiceError::Transport(message.into())
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        ServiceError::Network(message.into())
    }

    /// Create a normalization error
    pub fn normalization(message: impl Into<String>) -> Self {
        ServiceError::Normalization(message.into())
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        ServiceError::Authentication(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        ServiceError::Configuration(message.into())
    }

    /// Create an export error
    pub fn export(message: impl Into<String>) -> Self {
        ServiceError::Export(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::Internal(message.into())
    }

    /// Add context to an existing error
    pub fn with_context(self, context: ErrorContext) -> Self {
        ServiceError::WithContext {
            inner: Box::new(self),
            context,
        }
    }

    /// The error with all context layers peeled off
    pub fn root(&self) -> &ServiceError {
        match self {
            ServiceError::WithContext { inner, .. } => inner.root(),
            other => other,
        }
    }

    /// The bare human-readable message, without the category prefix
    pub fn message(&self) -> &str {
        match self {
            ServiceError::Validation(m)
            | ServiceError::Transport(m)
            | ServiceError::Network(m)
            | ServiceError::Normalization(m)
            | ServiceError::Authentication(m)
            | ServiceError::Configuration(m)
            | ServiceError::Export(m)
            | ServiceError::Internal(m) => m,
            ServiceError::WithContext { inner, .. } => inner.message(),
        }
    }

    /// The outermost context attached to this error, if any
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ServiceError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Get the service or screen name if available
    pub fn service_name(&self) -> Option<&str> {
        self.context().map(|c| c.service.as_str())
    }

    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ServiceError::WithContext { inner, context } => {
                context.status_code.or_else(|| inner.status_code())
            }
            _ => None,
        }
    }

    /// Get the response body snippet if available
    pub fn body_snippet(&self) -> Option<&str> {
        match self {
            ServiceError::WithContext { inner, context } => {
                context.body_snippet.as_deref().or_else(|| inner.body_snippet())
            }
            _ => None,
        }
    }

    /// Coarse category used by presentation
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::Transport(_) | ServiceError::Network(_) => ErrorKind::Transport,
            ServiceError::Normalization(_) => ErrorKind::Normalization,
            _ => ErrorKind::Other,
        }
    }
}

/// Error context information
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Screen or client that generated the error
    pub service: String,

    /// Time the error was recorded
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,

    /// HTTP status code if applicable
    pub status_code: Option<u16>,

    /// Submission ID for log correlation
    pub request_id: Option<String>,

    /// Endpoint that was called
    pub endpoint: Option<String>,

    /// Leading part of the raw response body
    pub body_snippet: Option<String>,

    /// Additional context data
    pub data: HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            service: "unknown".to_string(),
            timestamp: Some(chrono::Utc::now()),
            status_code: None,
            request_id: None,
            endpoint: None,
            body_snippet: None,
            data: HashMap::new(),
        }
    }
}

impl ErrorContext {
    /// Create a new error context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new error context for a specific screen or client
    pub fn for_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            ..Self::default()
        }
    }

    /// Add an HTTP status code
    pub fn status_code(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Add a request ID
    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Add an endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Keep a bounded snippet of a response body
    pub fn body(mut self, body: &str) -> Self {
        self.body_snippet = Some(truncate_string(body, BODY_SNIPPET_LIMIT));
        self
    }

    /// Add a context value
    pub fn add<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: fmt::Display,
    {
        self.data.insert(key.into(), value.to_string());
    }

    /// Add a context value and return self (builder pattern)
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: fmt::Display,
    {
        self.add(key, value);
        self
    }
}

/// Where a failure came from, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Transport,
    Normalization,
    Other,
}

/// Presentation-ready failure description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    /// Human-readable message, never empty
    pub message: String,

    /// HTTP status of the failed response, if one arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,

    /// Leading part of the raw response body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_snippet: Option<String>,

    /// Error category
    pub kind: ErrorKind,
}

impl ErrorInfo {
    /// Build an info record directly from a message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "Something went wrong. Please try again.".to_string()
        } else {
            message
        };

        Self {
            message,
            http_status: None,
            body_snippet: None,
            kind,
        }
    }
}

impl From<&ServiceError> for ErrorInfo {
    fn from(err: &ServiceError) -> Self {
        let mut info = ErrorInfo::new(err.kind(), err.message());
        info.http_status = err.status_code();
        info.body_snippet = err.body_snippet().map(str::to_string);
        info
    }
}

impl From<ServiceError> for ErrorInfo {
    fn from(err: ServiceError) -> Self {
        ErrorInfo::from(&err)
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.http_status {
            Some(status) => write!(f, "{} (HTTP {})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Convert reqwest errors to ServiceError
impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        let mut context = ErrorContext::for_service("http_client");
        if let Some(url) = err.url() {
            context = context.endpoint(url.path());
        }

        let service_error = if err.is_timeout() {
            ServiceError::network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ServiceError::network(format!("Connection error: {}", err))
        } else if err.is_request() {
            ServiceError::network(format!("Failed to send request: {}", err))
        } else if err.is_redirect() {
            ServiceError::network(format!("Too many redirects: {}", err))
        } else if err.is_body() || err.is_decode() {
            ServiceError::transport(format!("Failed to read response body: {}", err))
        } else {
            ServiceError::internal(format!("HTTP client error: {}", err))
        };

        // Add status code if available
        if let Some(status) = err.status() {
            service_error.with_context(context.status_code(status.as_u16()))
        } else {
            service_error.with_context(context)
        }
    }
}

/// Convert serde_json errors to ServiceError
impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::internal(format!("JSON error: {}", err))
            .with_context(ErrorContext::for_service("json"))
    }
}

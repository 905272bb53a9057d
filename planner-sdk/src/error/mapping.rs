//! Error mapping for backend responses
//!
//! Converts non-2xx responses and unusable 2xx bodies into the
//! normalized `ServiceError` type, keeping the status and a body snippet
//! in the attached context.

use reqwest::StatusCode;
use serde_json::Value;

use super::{ErrorContext, ServiceError, BODY_SNIPPET_LIMIT};
use crate::util::truncate_string;

/// Message used when a 2xx response carries no body at all
pub const EMPTY_BODY_MESSAGE: &str = "Empty response from server. Please try again later.";

/// Message used when a 2xx response body is not JSON
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON from server. Check API base URL and CORS.";

/// Map a non-2xx HTTP response to a transport error
///
/// The backend reports failures as `{"error": "..."}`; that text is preferred
/// when present. Otherwise the raw body (bounded) or the status line is used.
pub fn map_http_error(
    status: u16,
    body: &str,
    context: &mut ErrorContext,
) -> ServiceError {
    context.status_code = Some(status);
    if !body.is_empty() {
        *context = std::mem::take(context).body(body);
    }
    context.add("category", classify_http_error(status));

    let reason = status_line(status);

    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .or_else(|| json.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| truncate_string(trimmed, BODY_SNIPPET_LIMIT))
        });

    let message = match detail {
        Some(detail) => format!("API request failed: {} - {}", reason, detail),
        None => format!("API request failed: {}", reason),
    };

    ServiceError::transport(message)
}

/// Map a 2xx response whose body cannot be used as JSON
pub fn map_unusable_body(
    status: u16,
    body: &str,
    context: &mut ErrorContext,
) -> ServiceError {
    context.status_code = Some(status);

    if body.trim().is_empty() {
        return ServiceError::transport(EMPTY_BODY_MESSAGE);
    }

    *context = std::mem::take(context).body(body);
    ServiceError::transport(INVALID_JSON_MESSAGE)
}

/// Render a status as "404 Not Found", falling back to the bare number
fn status_line(status: u16) -> String {
    StatusCode::from_u16(status)
        .map(|s| s.to_string())
        .unwrap_or_else(|_| status.to_string())
}

/// Helper function to classify HTTP errors by category
pub fn classify_http_error(status: u16) -> &'static str {
    match status {
        400 => "validation",
        401 => "authentication",
        403 => "authorization",
        404 => "not_found",
        408 => "timeout",
        429 => "rate_limit",
        500..=599 => "server",
        _ => "unknown",
    }
}

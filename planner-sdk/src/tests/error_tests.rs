//! Tests for error handling functionality
//!
//! These tests verify the error taxonomy, context propagation and the
//! mapping of backend responses into presentation-ready `ErrorInfo`.

#[cfg(test)]
mod tests {
    use crate::error::mapping::{
        classify_http_error, map_http_error, map_unusable_body, EMPTY_BODY_MESSAGE,
        INVALID_JSON_MESSAGE,
    };
    use crate::error::{ErrorContext, ErrorInfo, ErrorKind, ServiceError, BODY_SNIPPET_LIMIT};

    #[test]
    fn test_service_error_creation() {
        let validation = ServiceError::validation("Please enter a topic.");
        let transport = ServiceError::transport("API request failed: 500");
        let normalization = ServiceError::normalization("Failed to generate roadmap.");

        assert_eq!(validation.to_string(), "Validation error: Please enter a topic.");
        assert_eq!(transport.to_string(), "Transport error: API request failed: 500");
        assert_eq!(normalization.message(), "Failed to generate roadmap.");

        assert_eq!(validation.kind(), ErrorKind::Validation);
        assert_eq!(transport.kind(), ErrorKind::Transport);
        assert_eq!(ServiceError::network("refused").kind(), ErrorKind::Transport);
        assert_eq!(normalization.kind(), ErrorKind::Normalization);
        assert_eq!(ServiceError::export("no clipboard").kind(), ErrorKind::Other);
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::for_service("roadmap")
            .status_code(502)
            .request_id("req-123")
            .endpoint("api/roadmap")
            .body("<html>Bad Gateway</html>")
            .with("attempt", 1);

        let err = ServiceError::transport("API request failed").with_context(context);

        assert_eq!(err.service_name(), Some("roadmap"));
        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.body_snippet(), Some("<html>Bad Gateway</html>"));
        assert_eq!(err.message(), "API request failed");
        assert!(err.to_string().contains("API request failed"));
        assert!(matches!(err.root(), ServiceError::Transport(_)));

        let ctx = err.context().unwrap();
        assert_eq!(ctx.request_id.as_deref(), Some("req-123"));
        assert_eq!(ctx.data.get("attempt").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_nested_context_keeps_inner_status() {
        let inner = ServiceError::network("Connection refused")
            .with_context(ErrorContext::for_service("http_client").status_code(503));
        let outer = inner.with_context(ErrorContext::for_service("resource_search"));

        assert_eq!(outer.service_name(), Some("resource_search"));
        assert_eq!(outer.status_code(), Some(503));
        assert_eq!(outer.message(), "Connection refused");
        assert_eq!(outer.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_map_http_error_prefers_backend_error_field() {
        let mut context = ErrorContext::for_service("resource_search");
        let err = map_http_error(404, r#"{"error": "Topic not found"}"#, &mut context);

        assert_eq!(err.message(), "API request failed: 404 Not Found - Topic not found");
        assert_eq!(context.status_code, Some(404));
        assert_eq!(context.data.get("category").map(String::as_str), Some("not_found"));
        assert!(context.body_snippet.as_deref().unwrap().contains("Topic not found"));
    }

    #[test]
    fn test_map_http_error_with_plain_and_empty_bodies() {
        let mut context = ErrorContext::new();
        let err = map_http_error(500, "Traceback (most recent call last)", &mut context);
        assert_eq!(
            err.message(),
            "API request failed: 500 Internal Server Error - Traceback (most recent call last)"
        );

        let mut context = ErrorContext::new();
        let err = map_http_error(503, "", &mut context);
        assert_eq!(err.message(), "API request failed: 503 Service Unavailable");
        assert!(context.body_snippet.is_none());
    }

    #[test]
    fn test_map_unusable_body() {
        let mut context = ErrorContext::new();
        let err = map_unusable_body(200, "  \n", &mut context);
        assert_eq!(err.message(), EMPTY_BODY_MESSAGE);
        assert!(context.body_snippet.is_none());

        let mut context = ErrorContext::new();
        let err = map_unusable_body(200, "<!doctype html><html></html>", &mut context);
        assert_eq!(err.message(), INVALID_JSON_MESSAGE);
        assert_eq!(context.status_code, Some(200));
        assert_eq!(context.body_snippet.as_deref(), Some("<!doctype html><html></html>"));
    }

    #[test]
    fn test_body_snippet_is_bounded() {
        let body = "é".repeat(BODY_SNIPPET_LIMIT * 3);
        let mut context = ErrorContext::new();
        let err = map_http_error(500, &body, &mut context);

        let snippet = context.body_snippet.unwrap();
        assert_eq!(snippet.chars().count(), BODY_SNIPPET_LIMIT);
        assert!(snippet.ends_with("..."));
        assert!(err.message().chars().count() < BODY_SNIPPET_LIMIT + 60);
    }

    #[test]
    fn test_classify_http_error() {
        assert_eq!(classify_http_error(400), "validation");
        assert_eq!(classify_http_error(401), "authentication");
        assert_eq!(classify_http_error(429), "rate_limit");
        assert_eq!(classify_http_error(502), "server");
        assert_eq!(classify_http_error(418), "unknown");
    }

    #[test]
    fn test_error_info_from_service_error() {
        let mut context = ErrorContext::for_service("predictor");
        let err = map_http_error(422, r#"{"message": "age missing"}"#, &mut context);
        let info = ErrorInfo::from(err.with_context(context));

        assert_eq!(info.kind, ErrorKind::Transport);
        assert_eq!(info.http_status, Some(422));
        assert!(info.message.ends_with("age missing"));
        assert!(info.body_snippet.is_some());
        assert_eq!(info.to_string(), format!("{} (HTTP 422)", info.message));
    }

    #[test]
    fn test_error_info_message_never_empty() {
        let info = ErrorInfo::from(ServiceError::internal("   "));
        assert!(!info.message.trim().is_empty());

        let info = ErrorInfo::new(ErrorKind::Validation, "Please enter a topic.");
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["message"], "Please enter a topic.");
        assert_eq!(json["kind"], "validation");
        assert!(json.get("httpStatus").is_none());
    }

    #[test]
    fn test_json_error_conversion() {
        let err: ServiceError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err.root(), ServiceError::Internal(_)));
        assert_eq!(err.service_name(), Some("json"));
    }
}

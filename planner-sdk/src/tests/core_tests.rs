//! Tests for core abstractions
//!
//! These tests verify the request/response types, the transport builder and
//! the payload models sent to the backend.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use crate::config::PlannerConfig;
    use crate::core::{
        ClientBuilder, FilePart, HttpMethod, HttpRequest, HttpResponse, MultipartBody,
        RequestBody, ServiceClient,
    };
    use crate::error::ServiceError;
    use crate::screens::{PredictionField, PredictionForm};
    use crate::services::models::{endpoints, PredictionPayload, ResumeFile, TopicPayload};
    use crate::services::{ReqwestTransport, UserAgent};

    #[test]
    fn test_http_request_builders() {
        let request = HttpRequest::get(endpoints::RESOURCES).query("topic", "Data Structures");
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.endpoint, "api/resources");
        assert_eq!(request.query_value("topic"), Some("Data Structures"));
        assert_eq!(request.query_value("page"), None);
        assert_eq!(request.body, RequestBody::Empty);

        let request =
            HttpRequest::post_json(endpoints::ROADMAP, &TopicPayload::new("SQL")).unwrap();
        assert_eq!(request.method.to_string(), "POST");
        assert_eq!(request.body, RequestBody::Json(json!({ "topic": "SQL" })));

        let form = MultipartBody::new().text("user_id", "me").file(FilePart {
            field: "resume".to_string(),
            file_name: "cv.txt".to_string(),
            content_type: Some("text/plain".to_string()),
            bytes: b"hello".to_vec(),
        });
        let request = HttpRequest::post_multipart(endpoints::INTERVIEW_UPLOAD, form);
        match request.body {
            RequestBody::Multipart(form) => {
                assert_eq!(form.fields, vec![("user_id".to_string(), "me".to_string())]);
                assert_eq!(form.files[0].field, "resume");
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_http_response_status() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(500, "{}").is_success());

        let response = HttpResponse::json(201, &json!({ "ok": true }));
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
        assert_eq!(response.body, r#"{"ok":true}"#);
    }

    #[test]
    fn test_client_builder() {
        let transport = ClientBuilder::new()
            .base_url("http://localhost:5000/")
            .timeout(Duration::from_secs(5))
            .user_agent("planner-tests")
            .header("X-Client", "tests")
            .build()
            .unwrap();

        assert_eq!(transport.base_url(), "http://localhost:5000");
        assert_eq!(transport.config().timeout, Some(Duration::from_secs(5)));
        assert_eq!(transport.version(), "v1");

        let default = crate::client().build().unwrap();
        assert_eq!(default.base_url(), "http://127.0.0.1:5000");
        assert!(default.config().timeout.is_none());
    }

    #[test]
    fn test_client_builder_rejects_bad_input() {
        let _ = env_logger::builder().is_test(true).try_init();

        let err = ClientBuilder::new().base_url("file:///tmp").build().err().unwrap();
        assert!(matches!(err, ServiceError::Configuration(_)));

        let err = ClientBuilder::new()
            .header("Bad Header", "x")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ServiceError::Configuration(_)));
    }

    #[test]
    fn test_transport_from_config() {
        let config = PlannerConfig {
            base_url: "https://planner.example.com".to_string(),
            timeout: None,
            user_agent: Some("custom".to_string()),
        };
        let transport = ReqwestTransport::new(config).unwrap();
        assert_eq!(transport.name(), "planner");
        assert_eq!(transport.config().user_agent.as_deref(), Some("custom"));
    }

    #[test]
    fn test_user_agent() {
        let agent = UserAgent::default().to_string();
        assert!(agent.starts_with("Study-Planner/"));
        assert!(agent.contains("planner-sdk"));
    }

    #[test]
    fn test_prediction_form_defaults() {
        let form = PredictionForm::new();
        assert_eq!(form.get(PredictionField::Higher), "0");
        assert_eq!(form.get(PredictionField::Internet), "0");
        assert_eq!(form.get(PredictionField::Age), "");
        assert_eq!(form.to_payload(), PredictionPayload::default());

        let names: Vec<&str> = PredictionField::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(names.len(), 13);
        assert_eq!("famrel".parse::<PredictionField>().unwrap(), PredictionField::Famrel);
        assert_eq!(PredictionField::Goout.label(), "Going Out (1-5)");
    }

    #[test]
    fn test_prediction_payload_always_has_every_field() {
        let value = serde_json::to_value(PredictionPayload::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 13);
        for field in PredictionField::ALL {
            assert_eq!(object[field.as_str()], json!(0), "{}", field);
        }
    }

    #[test]
    fn test_resume_file_content_type() {
        assert_eq!(
            ResumeFile::new("cv.PDF", vec![]).content_type.as_deref(),
            Some("application/pdf")
        );
        assert_eq!(ResumeFile::new("cv", vec![]).content_type, None);
        assert!(ResumeFile::from_path("/definitely/not/here.pdf").is_err());
    }
}

//! reqwest-backed transport for the planner backend
//!
//! Performs exactly one attempt per request and hands back the raw status,
//! content type and body text. No retries, no status interpretation.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::config::PlannerConfig;
use crate::core::{
    ClientBuilder, HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody,
    ServiceClient, Telemetry,
};
use crate::error::{ErrorContext, Result};
use crate::services::common::record_request_metrics;
use crate::util::{measure_time_async, sanitize_for_logging, truncate_string};

/// HTTP transport backed by a shared reqwest client
pub struct ReqwestTransport {
    /// HTTP client
    http_client: Client,

    /// Configuration
    config: PlannerConfig,

    /// Client metrics
    metrics: Mutex<HashMap<String, String>>,
}

impl ReqwestTransport {
    /// Create a transport from a configuration record
    pub fn new(config: PlannerConfig) -> Result<Self> {
        ClientBuilder::from_config(&config).build()
    }

    /// Create a transport from `PLANNER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(PlannerConfig::from_env()?)
    }

    /// Create a new builder
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn with_client(http_client: Client, config: PlannerConfig) -> Self {
        Self {
            http_client,
            config,
            metrics: Mutex::new(HashMap::new()),
        }
    }

    /// The configuration this transport was built from
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Resolve an endpoint against the base URL
    fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url, endpoint.trim_start_matches('/'))
    }

    fn metrics_guard(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.metrics.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.url_for(&request.endpoint);
        debug!("Sending request to planner backend: {} {}", request.method, url);

        let mut builder = match request.method {
            HttpMethod::Get => self.http_client.get(&url),
            HttpMethod::Post => self.http_client.post(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let mut bytes_sent = 0u64;
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => {
                let body = serde_json::to_vec(&value)?;
                bytes_sent = body.len() as u64;
                builder
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(body)
            }
            RequestBody::Multipart(form) => {
                let mut multipart = Form::new();
                for (name, value) in form.fields {
                    bytes_sent += value.len() as u64;
                    multipart = multipart.text(name, value);
                }
                for file in form.files {
                    bytes_sent += file.bytes.len() as u64;
                    let mut part = Part::bytes(file.bytes).file_name(file.file_name);
                    if let Some(content_type) = file.content_type {
                        part = part.mime_str(&content_type)?;
                    }
                    multipart = multipart.part(file.field, part);
                }
                builder.multipart(multipart)
            }
        };

        let start_time = std::time::Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                record_request_metrics(&request.endpoint, start_time, None, bytes_sent, 0);
                self.record_error(&request.endpoint, &e.to_string());
                warn!("Request to {} produced no response: {}", url, e);
                return Err(crate::error::ServiceError::from(e).with_context(
                    ErrorContext::for_service("planner").endpoint(request.endpoint.as_str()),
                ));
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await?;

        record_request_metrics(
            &request.endpoint,
            start_time,
            Some(status),
            bytes_sent,
            body.len() as u64,
        );
        Telemetry::record_request(self, &request.endpoint, status, start_time.elapsed());

        debug!(
            "Planner backend answered {} for {}: {}",
            status,
            url,
            sanitize_for_logging(&truncate_string(&body, 200))
        );

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.dispatch(request).await
    }
}

#[async_trait]
impl ServiceClient for ReqwestTransport {
    fn name(&self) -> &str {
        "planner"
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn version(&self) -> &str {
        "v1"
    }

    async fn health_check(&self) -> Result<bool> {
        let (outcome, duration) = measure_time_async(|| self.dispatch(HttpRequest::get(""))).await;
        match outcome {
            Ok(response) => {
                debug!("Planner health check answered {} in {:?}", response.status, duration);
                Ok(response.is_success())
            }
            Err(e) => {
                warn!("Planner health check failed: {}", e);
                Ok(false)
            }
        }
    }

    fn metrics(&self) -> Option<HashMap<String, String>> {
        Some(self.metrics_guard().clone())
    }
}

/// Increment a numeric counter stored as a string
fn bump(metrics: &mut HashMap<String, String>, key: &str) -> u64 {
    let next = metrics
        .get(key)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0)
        + 1;
    metrics.insert(key.to_string(), next.to_string());
    next
}

impl Telemetry for ReqwestTransport {
    fn record_request(&self, endpoint: &str, status: u16, duration: Duration) {
        let mut metrics = self.metrics_guard();
        let endpoint_key = endpoint.trim_matches('/').replace('/', "_");

        bump(&mut metrics, "request_count");
        let endpoint_count = bump(&mut metrics, &format!("{}_count", endpoint_key));

        // Running average latency for this endpoint
        let duration_key = format!("{}_avg_ms", endpoint_key);
        let duration_ms = duration.as_millis() as u64;
        let old_avg = metrics
            .get(&duration_key)
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);
        let new_avg = ((old_avg * (endpoint_count - 1)) + duration_ms) / endpoint_count;
        metrics.insert(duration_key, new_avg.to_string());

        bump(&mut metrics, &format!("status_{}", status));
    }

    fn record_error(&self, endpoint: &str, _error: &str) {
        let mut metrics = self.metrics_guard();
        let endpoint_key = endpoint.trim_matches('/').replace('/', "_");

        bump(&mut metrics, "error_count");
        bump(&mut metrics, &format!("{}_errors", endpoint_key));
    }

    fn metrics(&self) -> HashMap<String, String> {
        self.metrics_guard().clone()
    }

    fn reset_metrics(&self) {
        self.metrics_guard().clear();
    }
}

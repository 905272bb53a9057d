//! Client builder implementation
//!
//! Provides a builder for the reqwest-backed planner transport.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use log::error;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client as ReqwestClient;

use crate::config::{PlannerConfig, ServiceConfig, DEFAULT_API_BASE};
use crate::error::{Result, ServiceError};
use crate::services::common::UserAgent;
use crate::services::http::ReqwestTransport;

/// Builder for `ReqwestTransport`
pub struct ClientBuilder {
    /// Base URL for the backend
    base_url: Option<String>,

    /// Custom headers to include with all requests
    custom_headers: HashMap<String, String>,

    /// Request timeout; none by default
    timeout: Option<Duration>,

    /// User agent
    user_agent: Option<String>,

    /// Enable response decompression
    compression: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            custom_headers: HashMap::new(),
            timeout: None,
            user_agent: None,
            compression: true,
        }
    }
}

impl ClientBuilder {
    /// Create a new client builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded configuration
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            base_url: Some(config.base_url.clone()),
            timeout: config.timeout,
            user_agent: config.user_agent.clone(),
            ..Self::default()
        }
    }

    /// Set the base URL for the backend
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Add a custom header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(key.into(), value.into());
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Enable or disable compression
    pub fn compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }

    /// Build an HTTP client with the configured settings
    pub fn build_http_client(&self) -> Result<ReqwestClient> {
        let mut builder = ReqwestClient::builder();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| UserAgent::default().to_string());
        builder = builder.user_agent(user_agent);

        builder = builder.gzip(self.compression);

        let mut headers = HeaderMap::new();
        for (key, value) in &self.custom_headers {
            let header_name = HeaderName::from_str(key)
                .map_err(|e| ServiceError::configuration(format!("Invalid header name: {}", e)))?;

            let header_value = HeaderValue::from_str(value)
                .map_err(|e| ServiceError::configuration(format!("Invalid header value: {}", e)))?;

            headers.insert(header_name, header_value);
        }

        builder = builder.default_headers(headers);

        builder.build().map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            ServiceError::configuration(format!("Failed to build HTTP client: {}", e))
        })
    }

    /// Build the transport
    pub fn build(self) -> Result<ReqwestTransport> {
        let config = PlannerConfig {
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: self.timeout,
            user_agent: self.user_agent.clone(),
        };
        if let Err(e) = config.validate() {
            error!("Rejected client configuration: {}", e);
            return Err(e);
        }

        let http_client = self.build_http_client()?;
        Ok(ReqwestTransport::with_client(http_client, config))
    }
}

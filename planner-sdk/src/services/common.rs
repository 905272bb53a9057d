//! Common utilities for service clients
//!
//! This module provides shared functionality for all service clients.

use std::fmt;
use std::time::Instant;
use std::sync::atomic::{AtomicU64, Ordering};
use std::collections::HashMap;
use std::sync::Mutex;
use once_cell::sync::Lazy;

/// UserAgent structure for identifying the client to the backend
#[derive(Debug, Clone)]
pub struct UserAgent {
    /// Application name
    pub app_name: String,

    /// Version string
    pub version: String,

    /// Optional extra info
    pub extra: Option<String>,
}

impl Default for UserAgent {
    fn default() -> Self {
        Self {
            app_name: "Study-Planner".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            extra: Some("planner-sdk".to_string()),
        }
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_name, self.version)?;

        if let Some(ref extra) = self.extra {
            write!(f, " ({})", extra)?;
        }

        Ok(())
    }
}

/// Shared metrics collection for service clients
#[derive(Debug, Default)]
struct ClientMetrics {
    /// Total requests made
    request_count: AtomicU64,

    /// Total 2xx responses
    success_count: AtomicU64,

    /// Total non-2xx responses and transport failures
    error_count: AtomicU64,

    /// Total bytes sent
    bytes_sent: AtomicU64,

    /// Total bytes received
    bytes_received: AtomicU64,

    /// Per-endpoint metrics
    endpoint_metrics: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl ClientMetrics {
    fn endpoint_metrics(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<String, HashMap<String, String>>> {
        self.endpoint_metrics.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get metrics for a specific endpoint
    fn get_endpoint_metrics(&self, endpoint: &str) -> HashMap<String, String> {
        self.endpoint_metrics()
            .get(endpoint)
            .cloned()
            .unwrap_or_default()
    }

    /// Record an endpoint-specific metric
    fn record_endpoint_metric(&self, endpoint: &str, key: &str, value: String) {
        let mut metrics = self.endpoint_metrics();
        metrics
            .entry(endpoint.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Get all counters as a map
    fn as_map(&self) -> HashMap<String, String> {
        [
            ("request_count", &self.request_count),
            ("success_count", &self.success_count),
            ("error_count", &self.error_count),
            ("bytes_sent", &self.bytes_sent),
            ("bytes_received", &self.bytes_received),
        ]
        .into_iter()
        .map(|(name, counter)| (name.to_string(), counter.load(Ordering::Relaxed).to_string()))
        .collect()
    }
}

/// Process-wide client metrics
static GLOBAL_METRICS: Lazy<ClientMetrics> = Lazy::new(ClientMetrics::default);

/// Record process-wide metrics for one request
pub fn record_request_metrics(
    endpoint: &str,
    start_time: Instant,
    status: Option<u16>,
    bytes_sent: u64,
    bytes_received: u64,
) {
    GLOBAL_METRICS.request_count.fetch_add(1, Ordering::Relaxed);

    match status {
        Some(code) if (200..300).contains(&code) => {
            GLOBAL_METRICS.success_count.fetch_add(1, Ordering::Relaxed);
        }
        _ => {
            GLOBAL_METRICS.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    GLOBAL_METRICS.bytes_sent.fetch_add(bytes_sent, Ordering::Relaxed);
    GLOBAL_METRICS.bytes_received.fetch_add(bytes_received, Ordering::Relaxed);

    let duration = start_time.elapsed();
    GLOBAL_METRICS.record_endpoint_metric(
        endpoint,
        "last_latency",
        format!("{:.2}ms", duration.as_secs_f64() * 1000.0),
    );

    if let Some(code) = status {
        GLOBAL_METRICS.record_endpoint_metric(endpoint, "last_status", code.to_string());
    }
}

/// Get counters for all clients
pub fn get_global_metrics() -> HashMap<String, String> {
    GLOBAL_METRICS.as_map()
}

/// Get metrics for a specific endpoint
pub fn get_endpoint_metrics(endpoint: &str) -> HashMap<String, String> {
    GLOBAL_METRICS.get_endpoint_metrics(endpoint)
}

/// Reset all metrics
pub fn reset_metrics() {
    GLOBAL_METRICS.request_count.store(0, Ordering::Relaxed);
    GLOBAL_METRICS.success_count.store(0, Ordering::Relaxed);
    GLOBAL_METRICS.error_count.store(0, Ordering::Relaxed);
    GLOBAL_METRICS.bytes_sent.store(0, Ordering::Relaxed);
    GLOBAL_METRICS.bytes_received.store(0, Ordering::Relaxed);

    GLOBAL_METRICS.endpoint_metrics().clear();
}

//! # Planner SDK
//!
//! Client-side core of the AI study planner: the request orchestration and
//! response normalization shared by its data-driven screens.
//!
//! This crate provides:
//!
//! - Form field coercion into typed request payloads
//! - Normalization of loosely shaped backend responses into view models
//! - A per-screen request state machine (`Idle -> Pending -> Success | Failed`)
//! - Screen controllers for the predictor, resource search, roadmap builder
//!   and interview prep screens
//! - A reqwest-backed HTTP transport and its configuration
//!
//! ## Architecture
//!
//! - `HttpTransport`: the fetch-like collaborator every request goes through
//! - `RequestSession`: owns one screen's request lifecycle
//! - `ScreenKind`: what a screen validates, sends and reads back
//! - `AuthGate`: the opaque "logged in" flag screens are mounted through
//! - `ServiceError` / `ErrorInfo`: error taxonomy and its presentation shape

// Re-export core modules
pub mod core;
pub use core::{ClientBuilder, HttpRequest, HttpResponse, HttpTransport, ServiceClient, Telemetry};

// Re-export the reqwest transport and endpoint models
pub mod services;
pub use services::models;
pub use services::ReqwestTransport;

// Re-export error handling
pub mod error;
pub use error::{ErrorContext, ErrorInfo, ErrorKind, Result, ServiceError};

// Re-export configuration management
pub mod config;
pub use config::{ConfigProvider, PlannerConfig, ServiceConfig};

pub mod coerce;
pub mod normalize;
pub mod segment;

pub mod session;
pub use session::{RequestSession, ScreenKind, SessionState, Submission};

pub mod screens;
pub use screens::{InterviewPrepScreen, PredictorScreen, ResourceSearchScreen, RoadmapBuilderScreen};

pub mod auth;
pub use auth::{AuthGate, FileAuthGate, MemoryAuthGate};

pub mod export;
pub use export::{ArboardClipboard, ClipboardSink, DirectoryDownloads, DownloadSink, ExportOutcome};

// Utility module for common functionality
mod util;

#[cfg(test)]
mod tests;

/// Create a new default client builder
pub fn client() -> core::ClientBuilder {
    core::ClientBuilder::new()
}

/// Create a transport configured from `PLANNER_*` environment variables
pub fn transport_from_env() -> Result<std::sync::Arc<dyn HttpTransport>> {
    Ok(std::sync::Arc::new(ReqwestTransport::from_env()?))
}

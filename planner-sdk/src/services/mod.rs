//! Concrete clients for the planner backend
//!
//! This module contains the reqwest transport and the request/response
//! models of every backend endpoint.

pub mod http;
pub mod models;
pub(crate) mod common;

pub use common::{get_endpoint_metrics, get_global_metrics, reset_metrics, UserAgent};
pub use http::ReqwestTransport;

//! Unit tests for the planner SDK
//!
//! This module contains tests for various components of the SDK.

pub mod config_tests;
pub mod core_tests;
pub mod error_tests;
pub mod normalize_tests;

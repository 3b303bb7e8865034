//! HTTP client module for marketplace API checks
//!
//! Provides the request runner used by every scenario.

mod client;

pub use client::{ApiClient, ApiOutcome, ApiRequest, HttpResponse, DEFAULT_TIMEOUT_SECS};

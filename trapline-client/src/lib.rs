//! REST client for the platform's rule-management API
//!
//! A thin wrapper: every method maps to one endpoint, logs its arguments,
//! and surfaces non-success statuses as errors. The API itself (zones,
//! rules, captured requests) lives in a separate backend service; this
//! crate only speaks its wire format.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ClientError;

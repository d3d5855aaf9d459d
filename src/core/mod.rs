//! Core utilities shared by the fetchers and the ingest pipeline
//!
//! - `http`: header setup for the pulse API
//! - `retry`: bounded exponential backoff around transient failures

pub mod http;
pub mod retry;

pub use http::{pulse_header_map, PULSE_BASE_URL};
pub use retry::{retry_async, retry_blocking, RetryPolicy};

//! Transport abstraction for outbound HTTPS requests
//!
//! This module provides a small trait over HTTP GET so the branch resolver and
//! archive fetcher can be driven by an in-memory implementation in tests.

use core::time::Duration;
use thiserror::Error;

pub mod mock;
pub mod real;

pub use mock::MockTransport;
pub use real::ReqwestTransport;

/// Response to a GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new response
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Failure to obtain any response at all
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportError {
    /// The request did not complete within its timeout
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Connection, TLS or body read failure
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

/// Blocking HTTP GET
///
/// # Implementations
/// - `ReqwestTransport`: Production implementation using `reqwest::blocking`
/// - `MockTransport`: Test implementation with canned responses
pub trait Transport: Send + Sync {
    /// Issue a GET request, bounded by `timeout`
    ///
    /// Non-success statuses are returned as responses, not errors.
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError>;
}

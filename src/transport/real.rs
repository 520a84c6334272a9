//! Real transport implementation using `reqwest::blocking`

use super::{HttpResponse, Transport, TransportError};
use anyhow::{Context as _, Result};
use core::time::Duration;
use reqwest::blocking::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};

/// Production implementation of the Transport trait
///
/// Holds one `reqwest` client so connections are reused between the
/// metadata request and the archive downloads.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new transport identifying itself with `user_agent`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The user agent is not a valid header value
    /// - The HTTP client cannot be built
    #[inline]
    pub fn new(user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(user_agent)
                .with_context(|| format!("Invalid user agent: {user_agent}"))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        return Ok(Self { client });
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let map_error = |e: reqwest::Error| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: url.to_owned(),
                }
            } else {
                TransportError::Request {
                    url: url.to_owned(),
                    message: e.to_string(),
                }
            }
        };

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(map_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().map_err(map_error)?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

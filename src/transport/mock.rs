//! Mock transport implementation for testing

use super::{HttpResponse, Transport, TransportError};
use core::time::Duration;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory implementation of the Transport trait for testing
///
/// Responses are registered per URL. Unregistered URLs answer `404` with an
/// empty body, which is what the hosting service does for unknown branches.
/// Every request is recorded in order.
///
/// # Example
/// ```
/// use snapclone::transport::{MockTransport, Transport};
/// use std::time::Duration;
///
/// let transport = MockTransport::new()
///     .with_response("https://api.example/repos/a/b", 200, br#"{"default_branch":"dev"}"#);
///
/// let response = transport
///     .get("https://api.example/repos/a/b", Duration::from_secs(1))
///     .unwrap();
/// assert!(response.is_success());
/// assert_eq!(transport.requests(), vec!["https://api.example/repos/a/b"]);
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<RwLock<MockTransportState>>,
}

#[derive(Default)]
struct MockTransportState {
    routes: HashMap<String, Result<HttpResponse, TransportError>>,
    requests: Vec<MockRequest>,
}

/// A request seen by `MockTransport`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    pub url: String,
    pub timeout: Duration,
}

impl MockTransport {
    /// Create a new `MockTransport` with no registered routes
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `status` and `body` (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_response(self, url: &str, status: u16, body: &[u8]) -> Self {
        self.route(url, Ok(HttpResponse::new(status, body)))
    }

    /// Fail requests to `url` with a timeout (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_timeout(self, url: &str) -> Self {
        self.route(
            url,
            Err(TransportError::Timeout {
                url: url.to_owned(),
            }),
        )
    }

    /// Fail requests to `url` with a connection error (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_failure(self, url: &str, message: &str) -> Self {
        self.route(
            url,
            Err(TransportError::Request {
                url: url.to_owned(),
                message: message.to_owned(),
            }),
        )
    }

    /// URLs requested so far, in order
    #[must_use]
    #[inline]
    pub fn requests(&self) -> Vec<String> {
        self.recorded().into_iter().map(|r| r.url).collect()
    }

    /// Requests recorded so far, including their timeouts
    #[must_use]
    #[inline]
    pub fn recorded(&self) -> Vec<MockRequest> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.requests.clone()
    }

    fn route(self, url: &str, outcome: Result<HttpResponse, TransportError>) -> Self {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.routes.insert(url.to_owned(), outcome);
        drop(state);
        self
    }
}

impl Transport for MockTransport {
    #[inline]
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.requests.push(MockRequest {
            url: url.to_owned(),
            timeout,
        });
        let outcome = state
            .routes
            .get(url)
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse::new(404, Vec::new())));
        drop(state);
        outcome
    }
}

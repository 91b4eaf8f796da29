//! Per-request state shared by the stages of a pipeline.

use std::time::{Duration, Instant};

use lookup_broker_core::RequestId;

/// What the stages of one request share: the correlation id, the matched
/// route pattern and the start instant.
///
/// # Example
///
/// ```
/// use lookup_broker_middleware::MiddlewareContext;
///
/// let mut ctx = MiddlewareContext::new();
/// ctx.set_route("/v2/catalog");
/// assert_eq!(ctx.route(), Some("/v2/catalog"));
/// ```
#[derive(Debug)]
pub struct MiddlewareContext {
    request_id: RequestId,
    route: Option<String>,
    started_at: Instant,
}

impl MiddlewareContext {
    /// Creates a context with a fresh request id.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a context with a known request id.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            route: None,
            started_at: Instant::now(),
        }
    }

    /// Returns the request id.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Replaces the request id (set from `X-Broker-API-Request-Identity`).
    pub fn set_request_id(&mut self, request_id: RequestId) {
        self.request_id = request_id;
    }

    /// Returns the matched route pattern, if any.
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Records the matched route pattern.
    pub fn set_route(&mut self, route: impl Into<String>) {
        self.route = Some(route.into());
    }

    /// Time since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for MiddlewareContext {
    fn default() -> Self {
        Self::new()
    }
}

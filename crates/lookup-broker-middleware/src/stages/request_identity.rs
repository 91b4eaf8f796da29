//! Request identity logger.
//!
//! Logs `X-Broker-API-Request-Identity` verbatim, or its absence. A value
//! that is a UUID also becomes the context's request id so every later log
//! line carries the platform's correlation id.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use lookup_broker_core::protocol::{REQUEST_IDENTITY_HEADER, REQUEST_IDENTITY_HEADER_NAME};
use lookup_broker_core::RequestId;

/// Logs the platform's request identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdentityMiddleware;

impl RequestIdentityMiddleware {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for RequestIdentityMiddleware {
    fn name(&self) -> &'static str {
        "request_identity"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let value = request
                .headers()
                .get(REQUEST_IDENTITY_HEADER)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .filter(|v| !v.is_empty());

            match value {
                Some(identity) => {
                    if let Some(id) = RequestId::parse(&identity) {
                        ctx.set_request_id(id);
                    }
                    tracing::info!(request_id = %ctx.request_id(), "request identity: {identity}");
                }
                None => {
                    tracing::info!(
                        request_id = %ctx.request_id(),
                        "header {REQUEST_IDENTITY_HEADER_NAME} not set"
                    );
                }
            }

            next.run(ctx, request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::{create_handler, request_with};
    use http::StatusCode;
    use lookup_broker_core::fixtures;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn test_logs_request_identity() {
        let mut ctx = MiddlewareContext::new();
        let request = request_with(&[(REQUEST_IDENTITY_HEADER, fixtures::REQUEST_IDENTITY)]);
        let response = RequestIdentityMiddleware::new()
            .process(&mut ctx, request, Next::handler(create_handler()))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(logs_contain(fixtures::REQUEST_IDENTITY));
        assert_eq!(ctx.request_id().to_string(), fixtures::REQUEST_IDENTITY);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_free_text_identity_is_logged_only() {
        let mut ctx = MiddlewareContext::new();
        let before = ctx.request_id();
        let request = request_with(&[(REQUEST_IDENTITY_HEADER, "platform-req-7")]);
        RequestIdentityMiddleware::new()
            .process(&mut ctx, request, Next::handler(create_handler()))
            .await;

        assert!(logs_contain("request identity: platform-req-7"));
        assert_eq!(ctx.request_id(), before);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_logs_absence() {
        let mut ctx = MiddlewareContext::new();
        let response = RequestIdentityMiddleware::new()
            .process(&mut ctx, request_with(&[]), Next::handler(create_handler()))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(logs_contain("header X-Broker-API-Request-Identity not set"));
    }
}

//! Originating identity logger.
//!
//! Decodes `X-Broker-API-Originating-Identity` and logs the identity. A
//! malformed header is logged as an error; the request always continues.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use lookup_broker_core::parse_originating_identity;
use lookup_broker_core::protocol::{
    ORIGINATING_IDENTITY_HEADER, ORIGINATING_IDENTITY_HEADER_NAME,
};

/// Logs the user on whose behalf the platform calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct OriginatingIdentityMiddleware;

impl OriginatingIdentityMiddleware {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for OriginatingIdentityMiddleware {
    fn name(&self) -> &'static str {
        "originating_identity"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let request_id = ctx.request_id();
            let value = request
                .headers()
                .get(ORIGINATING_IDENTITY_HEADER)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .filter(|v| !v.trim().is_empty());

            match value.as_deref().map(parse_originating_identity) {
                Some(Ok(identity)) => {
                    tracing::info!(
                        request_id = %request_id,
                        platform = %identity.platform,
                        user_id = %identity.user_id.user_id,
                        "originating identity: {identity}"
                    );
                }
                Some(Err(err)) => {
                    tracing::error!(
                        request_id = %request_id,
                        error = %err,
                        "invalid {ORIGINATING_IDENTITY_HEADER_NAME} header: {}",
                        value.as_deref().unwrap_or_default()
                    );
                }
                None => {
                    tracing::info!(
                        request_id = %request_id,
                        "header {ORIGINATING_IDENTITY_HEADER_NAME} not set"
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

    async fn run(headers: &[(&str, &str)]) -> StatusCode {
        let mut ctx = MiddlewareContext::new();
        OriginatingIdentityMiddleware::new()
            .process(&mut ctx, request_with(headers), Next::handler(create_handler()))
            .await
            .status()
    }

    #[tokio::test]
    #[traced_test]
    async fn test_logs_decoded_identity() {
        let status = run(&[(ORIGINATING_IDENTITY_HEADER, fixtures::ORIGINATING_IDENTITY)]).await;

        assert_eq!(status, StatusCode::OK);
        assert!(logs_contain("cloudfoundry"));
        assert!(logs_contain(fixtures::ORIGINATING_USER_ID));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_malformed_base64_does_not_block() {
        let status = run(&[(ORIGINATING_IDENTITY_HEADER, "cloudfoundry %%%")]).await;

        assert_eq!(status, StatusCode::OK);
        assert!(logs_contain("ERROR"));
        assert!(logs_contain("not base64 encoded"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_logs_absence_as_info() {
        let status = run(&[]).await;

        assert_eq!(status, StatusCode::OK);
        assert!(logs_contain("header X-Broker-API-Originating-Identity not set"));
        assert!(!logs_contain("ERROR"));
    }
}

//! API version gate.
//!
//! Compares the major component of `X-Broker-API-Version` with the
//! supported version and answers 412 with an OSB error on a missing header
//! or a different major. Minor and patch levels are not checked.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response, ResponseExt};
use lookup_broker_core::protocol::{check_api_version, API_VERSION_HEADER, SUPPORTED_API_VERSION};

/// Rejects requests speaking an incompatible OSB major version.
#[derive(Debug, Clone)]
pub struct ApiVersionMiddleware {
    supported: String,
}

impl ApiVersionMiddleware {
    /// Creates a gate for `supported` (e.g. `2.14`).
    #[must_use]
    pub fn new(supported: impl Into<String>) -> Self {
        Self {
            supported: supported.into(),
        }
    }

    /// The supported version.
    #[must_use]
    pub fn supported(&self) -> &str {
        &self.supported
    }
}

impl Default for ApiVersionMiddleware {
    fn default() -> Self {
        Self::new(SUPPORTED_API_VERSION)
    }
}

impl Middleware for ApiVersionMiddleware {
    fn name(&self) -> &'static str {
        "api_version"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let requested = request
                .headers()
                .get(API_VERSION_HEADER)
                .and_then(|v| v.to_str().ok());

            if let Err(err) = check_api_version(requested, &self.supported) {
                tracing::error!(request_id = %ctx.request_id(), error = %err, "API version rejected");
                return Response::broker_error(&err);
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
    use http_body_util::BodyExt;
    use tracing_test::traced_test;

    async fn status_for(headers: &[(&str, &str)]) -> StatusCode {
        let middleware = ApiVersionMiddleware::default();
        let mut ctx = MiddlewareContext::new();
        let next = Next::handler(create_handler());
        middleware
            .process(&mut ctx, request_with(headers), next)
            .await
            .status()
    }

    #[tokio::test]
    #[traced_test]
    async fn test_missing_header_is_412() {
        let middleware = ApiVersionMiddleware::default();
        let mut ctx = MiddlewareContext::new();
        let next = Next::handler(create_handler());
        let response = middleware.process(&mut ctx, request_with(&[]), next).await;

        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Precondition Failed");
        assert!(body["description"]
            .as_str()
            .unwrap()
            .contains("X-Broker-API-Version not set"));
        assert!(logs_contain("API version rejected"));
    }

    #[tokio::test]
    async fn test_wrong_format_is_412() {
        assert_eq!(
            status_for(&[(API_VERSION_HEADER, "abc")]).await,
            StatusCode::PRECONDITION_FAILED
        );
    }

    #[tokio::test]
    async fn test_wrong_major_is_412() {
        assert_eq!(
            status_for(&[(API_VERSION_HEADER, "1.2")]).await,
            StatusCode::PRECONDITION_FAILED
        );
    }

    #[tokio::test]
    async fn test_matching_major_passes() {
        for version in ["2.14", "2.2", "2.99", "2"] {
            assert_eq!(
                status_for(&[(API_VERSION_HEADER, version)]).await,
                StatusCode::OK,
                "{version}"
            );
        }
    }

    #[tokio::test]
    async fn test_configured_version() {
        let middleware = ApiVersionMiddleware::new("3.0");
        assert_eq!(middleware.supported(), "3.0");

        let mut ctx = MiddlewareContext::new();
        let next = Next::handler(create_handler());
        let response = middleware
            .process(&mut ctx, request_with(&[(API_VERSION_HEADER, "2.14")]), next)
            .await;
        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
    }
}

//! Request log and metrics.
//!
//! Logs every request on entry and its execution time on exit, and records
//! the request counter, latency histogram and in-flight gauge. Runs
//! outermost on all routes.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use lookup_broker_telemetry::{record_request, InFlightGuard};

/// Route label used when no route matched.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Logs and measures each request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogMiddleware;

impl RequestLogMiddleware {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for RequestLogMiddleware {
    fn name(&self) -> &'static str {
        "request_log"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let _in_flight = InFlightGuard::new();
            let method = request.method().clone();
            let path = request.uri().path().to_string();

            tracing::info!(
                request_id = %ctx.request_id(),
                http.method = %method,
                http.path = %path,
                "new request"
            );

            let response = next.run(ctx, request).await;
            let duration = ctx.elapsed();
            let route = ctx.route().unwrap_or(UNMATCHED_ROUTE);

            tracing::info!(
                request_id = %ctx.request_id(),
                http.method = %method,
                http.path = %path,
                http.status_code = response.status().as_u16(),
                duration_ms = duration.as_secs_f64() * 1000.0,
                "execution time: {duration:?}"
            );
            record_request(route, response.status().as_u16(), duration);

            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::{create_handler, request_with};
    use http::StatusCode;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn test_logs_entry_and_exit() {
        let mut ctx = MiddlewareContext::new();
        ctx.set_route("/v2/catalog");

        let response = RequestLogMiddleware::new()
            .process(&mut ctx, request_with(&[]), Next::handler(create_handler()))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(logs_contain("new request"));
        assert!(logs_contain("execution time"));
        assert!(logs_contain("/v2/catalog"));
        assert!(logs_contain("http.status_code=200"));
    }

    #[test]
    fn test_stage_name() {
        assert_eq!(RequestLogMiddleware::new().name(), "request_log");
    }
}

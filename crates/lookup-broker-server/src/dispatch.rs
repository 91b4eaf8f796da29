//! Route dispatch through scoped pipelines.
//!
//! A [`Dispatcher`] owns the router, the handler registry and one
//! [`Pipeline`] per path scope. A matched request runs the pipeline of the
//! longest scope its path falls under (or the default pipeline), then the
//! route's handler. Unmatched requests run the default pipeline and answer
//! 405 when the path is routed under another method, 404 otherwise.
//!
//! ```text
//! match route ──► scope pipeline ──► content type check ──► handler
//!      │                                  │ 415                │ Err → OSB error
//!      └─ none ──► default pipeline ──► 405 / 404
//! ```

use std::sync::Arc;

use http::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use http::{HeaderMap, Method};
use lookup_broker_core::BrokerError;
use lookup_broker_middleware::stages::request_log::UNMATCHED_ROUTE;
use lookup_broker_middleware::{MiddlewareContext, Pipeline, Request, Response, ResponseExt};

use crate::handler::HandlerRegistry;
use crate::router::{RouteMatch, Router};

/// Dispatches requests to handlers through the configured pipelines.
#[derive(Debug)]
pub struct Dispatcher {
    router: Router,
    handlers: Arc<HandlerRegistry>,
    scopes: Vec<(String, Pipeline)>,
    default_pipeline: Pipeline,
}

impl Dispatcher {
    /// Creates a dispatcher builder.
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// The router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The handler registry.
    #[must_use]
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Returns the pipeline that runs for `path`.
    #[must_use]
    pub fn pipeline_for(&self, path: &str) -> &Pipeline {
        self.scopes
            .iter()
            .filter(|(prefix, _)| in_scope(prefix, path))
            .max_by_key(|(prefix, _)| prefix.len())
            .map_or(&self.default_pipeline, |(_, pipeline)| pipeline)
    }

    /// Dispatches `request` with a fresh context.
    pub async fn dispatch(&self, request: Request) -> Response {
        self.dispatch_with_context(MiddlewareContext::new(), request)
            .await
    }

    /// Dispatches `request` with the given context.
    pub async fn dispatch_with_context(
        &self,
        mut ctx: MiddlewareContext,
        request: Request,
    ) -> Response {
        let path = request.uri().path().to_string();

        let Some(route) = self.router.match_route(request.method(), &path) else {
            ctx.set_route(UNMATCHED_ROUTE);
            let allowed = self.router.allowed_methods(&path);
            let method = request.method().to_string();
            let err = if allowed.is_empty() {
                BrokerError::RouteNotFound { method, path }
            } else {
                BrokerError::MethodNotAllowed { method, path }
            };
            return self
                .default_pipeline
                .process(ctx, request, move |_ctx, _request| {
                    Box::pin(async move { unmatched_response(&err, &allowed) })
                })
                .await;
        };

        ctx.set_route(route.pattern());
        let handlers = Arc::clone(&self.handlers);

        self.pipeline_for(&path)
            .process(ctx, request, move |_ctx, request| {
                Box::pin(async move { run_handler(&handlers, route, request).await })
            })
            .await
    }
}

async fn run_handler(handlers: &HandlerRegistry, route: RouteMatch, request: Request) -> Response {
    if let Some(expected) = route.content_type() {
        if !has_content_type(request.headers(), expected) {
            return Response::broker_error(&BrokerError::UnsupportedMediaType {
                expected: expected.to_string(),
            });
        }
    }

    let operation_id = route.operation_id().to_string();
    match handlers.invoke(route, request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(operation_id = %operation_id, error = %err, "request failed");
            Response::broker_error(&err)
        }
    }
}

fn unmatched_response(err: &BrokerError, allowed: &[Method]) -> Response {
    let mut response = Response::broker_error(err);
    if !allowed.is_empty() {
        let methods: Vec<&str> = allowed.iter().map(Method::as_str).collect();
        if let Ok(value) = HeaderValue::from_str(&methods.join(", ")) {
            response.headers_mut().insert(ALLOW, value);
        }
    }
    response
}

fn in_scope(prefix: &str, path: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Whether the `Content-Type` media type equals `expected`, ignoring
/// parameters such as `charset`.
fn has_content_type(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(expected))
}

/// Builder for [`Dispatcher`].
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    router: Router,
    handlers: HandlerRegistry,
    scopes: Vec<(String, Pipeline)>,
    default_pipeline: Option<Pipeline>,
}

impl DispatcherBuilder {
    /// Sets the router.
    pub fn router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    /// Sets the handler registry.
    pub fn handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Runs `pipeline` for every path equal to or below `prefix`.
    pub fn scope(mut self, prefix: impl Into<String>, pipeline: Pipeline) -> Self {
        let prefix = prefix.into();
        let prefix = prefix.trim_end_matches('/').to_string();
        self.scopes.push((prefix, pipeline));
        self
    }

    /// Pipeline for paths outside every scope and for unmatched requests.
    pub fn default_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.default_pipeline = Some(pipeline);
        self
    }

    /// Builds the dispatcher. Routes without a handler are logged.
    pub fn build(self) -> Dispatcher {
        for operation_id in self.router.operation_ids() {
            if !self.handlers.contains(operation_id) {
                tracing::warn!(operation_id = %operation_id, "route has no handler");
            }
        }

        Dispatcher {
            router: self.router,
            handlers: Arc::new(self.handlers),
            scopes: self.scopes,
            default_pipeline: self
                .default_pipeline
                .unwrap_or_else(|| Pipeline::builder().build()),
        }
    }
}

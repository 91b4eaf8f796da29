//! Handler registration and invocation.
//!
//! Handlers are registered against an operation id. Each receives the
//! [`RouteMatch`] (for path parameters) and the collected request, and
//! returns a response or a [`BrokerError`] that the dispatcher renders as an
//! OSB error envelope.
//!
//! # Example
//!
//! ```rust
//! use http::StatusCode;
//! use lookup_broker_middleware::{Response, ResponseExt};
//! use lookup_broker_server::HandlerRegistry;
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register("health", |_route, _request| async {
//!     Ok(Response::json(StatusCode::OK, &serde_json::json!({"ok": true})))
//! });
//! assert!(registry.contains("health"));
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use lookup_broker_core::{BrokerError, BrokerResult};
use lookup_broker_middleware::{BoxFuture, Request, Response};

use crate::router::RouteMatch;

/// A type-erased handler.
pub type ErasedHandler =
    Arc<dyn Fn(RouteMatch, Request) -> BoxFuture<'static, BrokerResult<Response>> + Send + Sync>;

/// Maps operation ids to handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, ErasedHandler>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `operation_id`, replacing any previous one.
    pub fn register<F, Fut>(&mut self, operation_id: impl Into<String>, handler: F)
    where
        F: Fn(RouteMatch, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BrokerResult<Response>> + Send + 'static,
    {
        let erased: ErasedHandler =
            Arc::new(move |route, request| Box::pin(handler(route, request)));
        self.handlers.insert(operation_id.into(), erased);
    }

    /// Returns the handler for `operation_id`.
    #[must_use]
    pub fn get(&self, operation_id: &str) -> Option<&ErasedHandler> {
        self.handlers.get(operation_id)
    }

    /// Whether a handler is registered for `operation_id`.
    #[must_use]
    pub fn contains(&self, operation_id: &str) -> bool {
        self.handlers.contains_key(operation_id)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered operation ids, in no particular order.
    pub fn operation_ids(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Invokes the handler of the matched route.
    ///
    /// A route without a registered handler answers
    /// [`BrokerError::NotImplemented`].
    pub async fn invoke(&self, route: RouteMatch, request: Request) -> BrokerResult<Response> {
        let Some(handler) = self.handlers.get(route.operation_id()) else {
            tracing::warn!(operation_id = %route.operation_id(), "no handler registered");
            return Err(BrokerError::NotImplemented(route.operation_id().to_string()));
        };
        let handler = Arc::clone(handler);
        handler(route, request).await
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&str> = self.operation_ids().collect();
        ids.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("operations", &ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Router;
    use bytes::Bytes;
    use http::{Method, StatusCode};
    use http_body_util::Full;
    use lookup_broker_middleware::ResponseExt;

    fn route(op: &str) -> RouteMatch {
        let mut router = Router::new();
        router.add_route(Method::GET, "/v2/service_instances/{instance_id}", op);
        router
            .match_route(&Method::GET, "/v2/service_instances/abc")
            .unwrap()
    }

    fn request() -> Request {
        http::Request::new(Full::new(Bytes::new()))
    }

    #[test]
    fn test_registry_new() {
        let registry = HandlerRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test]
    async fn test_invoke_passes_route_params() {
        let mut registry = HandlerRegistry::new();
        registry.register("getInstance", |route: RouteMatch, _request| async move {
            let id = route.param("instance_id").unwrap_or_default().to_string();
            Ok(Response::text(StatusCode::OK, id))
        });

        let response = registry
            .invoke(route("getInstance"), request())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invoke_propagates_handler_error() {
        let mut registry = HandlerRegistry::new();
        registry.register("getInstance", |_route, _request| async {
            Err(BrokerError::MissingSpaceGuid)
        });

        let err = registry
            .invoke(route("getInstance"), request())
            .await
            .unwrap_err();
        assert_eq!(err, BrokerError::MissingSpaceGuid);
    }

    #[tokio::test]
    async fn test_invoke_unregistered_is_not_implemented() {
        let registry = HandlerRegistry::new();
        let err = registry
            .invoke(route("getInstance"), request())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn test_registry_debug_lists_operations() {
        let mut registry = HandlerRegistry::new();
        registry.register("b", |_r, _q| async { Ok(Response::empty(StatusCode::OK)) });
        registry.register("a", |_r, _q| async { Ok(Response::empty(StatusCode::OK)) });
        assert_eq!(
            format!("{registry:?}"),
            r#"HandlerRegistry { operations: ["a", "b"] }"#
        );
    }
}

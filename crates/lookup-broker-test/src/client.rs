//! In-memory client driving a [`Dispatcher`] without a socket.

use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use lookup_broker_server::Dispatcher;
use serde::Serialize;

use crate::error::TestError;
use crate::request::TestRequestBuilder;
use crate::response::TestResponse;

/// Sends requests straight through a dispatcher's pipelines and handlers.
///
/// # Example
///
/// ```
/// use lookup_broker_server::{Dispatcher, HandlerRegistry, Router};
/// use lookup_broker_middleware::{Response, ResponseExt};
/// use lookup_broker_test::TestClient;
/// use http::{Method, StatusCode};
///
/// # tokio_test::block_on(async {
/// let mut router = Router::new();
/// router.add_route(Method::GET, "/health", "health");
/// let mut handlers = HandlerRegistry::new();
/// handlers.register("health", |_route, _request| async {
///     Ok(Response::json(StatusCode::OK, &serde_json::json!({"ok": true})))
/// });
///
/// let client = TestClient::new(Dispatcher::builder().router(router).handlers(handlers).build());
/// client
///     .get("/health")
///     .send()
///     .await
///     .unwrap()
///     .assert_status(StatusCode::OK)
///     .assert_json_eq(&serde_json::json!({"ok": true}));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct TestClient {
    dispatcher: Arc<Dispatcher>,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Wraps `dispatcher`.
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            default_headers: Vec::new(),
        }
    }

    /// Adds a header sent with every request, e.g. the API version.
    #[must_use]
    pub fn with_default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.default_headers
            .push((name.as_ref().to_string(), value.as_ref().to_string()));
        self
    }

    /// The wrapped dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Starts a GET request.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// Starts a PUT request.
    pub fn put(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// Starts a PATCH request.
    pub fn patch(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Starts a POST request.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// Starts a request with any method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        let builder = self
            .default_headers
            .iter()
            .fold(TestRequestBuilder::new(method, uri), |builder, (name, value)| {
                builder.header(name, value)
            });

        TestClientRequest {
            client: self,
            builder,
        }
    }
}

/// A request being prepared by a [`TestClient`].
#[must_use]
#[derive(Debug)]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    builder: TestRequestBuilder,
}

impl TestClientRequest<'_> {
    /// Adds a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Sets `Content-Type`.
    pub fn content_type(mut self, content_type: impl AsRef<str>) -> Self {
        self.builder = self.builder.content_type(content_type);
        self
    }

    /// Sets a raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Sets a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.builder = self.builder.json(value);
        self
    }

    /// Dispatches the request and reads the response.
    pub async fn send(self) -> Result<TestResponse, TestError> {
        let request = self.builder.build()?;
        let response = self.client.dispatcher.dispatch(request).await;
        TestResponse::from_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use http_body_util::{BodyExt, Collected};
    use lookup_broker_middleware::{Response, ResponseExt};
    use lookup_broker_server::{HandlerRegistry, Router};

    fn client() -> TestClient {
        let mut router = Router::new();
        router.add_route(Method::GET, "/echo-header", "echo_header");
        router.add_route_consuming(Method::PUT, "/echo/{id}", "echo", "application/json");

        let mut handlers = HandlerRegistry::new();
        handlers.register("echo_header", |_route, request| async move {
            let value = request
                .headers()
                .get("x-test")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Ok(Response::text(StatusCode::OK, value))
        });
        handlers.register("echo", |route, request| async move {
            let id = route.param("id").unwrap_or_default().to_string();
            let bytes = request.into_body().collect().await.map(Collected::to_bytes).unwrap_or_default();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or_default();
            Ok(Response::json(StatusCode::OK, &serde_json::json!({"id": id, "body": body})))
        });

        TestClient::new(Dispatcher::builder().router(router).handlers(handlers).build())
    }

    #[tokio::test]
    async fn test_default_header_is_sent() {
        client()
            .with_default_header("x-test", "hello")
            .get("/echo-header")
            .send()
            .await
            .unwrap()
            .assert_status(StatusCode::OK)
            .assert_body_contains("hello");
    }

    #[tokio::test]
    async fn test_json_request() {
        client()
            .put("/echo/42")
            .json(&serde_json::json!({"a": 1}))
            .send()
            .await
            .unwrap()
            .assert_status(StatusCode::OK)
            .assert_json_field("id", &serde_json::json!("42"))
            .assert_json_field("body.a", &serde_json::json!(1));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        client()
            .delete("/nowhere")
            .send()
            .await
            .unwrap()
            .assert_osb_error(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_build_error_surfaces_on_send() {
        let result = client().get("/echo-header").header("bad name", "x").send().await;
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }
}

//! Test request builder.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderName, HeaderValue, Method};
use http_body_util::Full;
use lookup_broker_middleware::Request;
use serde::Serialize;

use crate::error::TestError;

/// Builds a [`Request`] for the dispatcher.
///
/// Invalid header names, values or URIs and JSON encoding failures are
/// reported by [`build`](Self::build), not when set.
///
/// ```
/// use lookup_broker_test::TestRequestBuilder;
/// use http::Method;
///
/// let request = TestRequestBuilder::new(Method::PUT, "/v2/service_instances/1")
///     .header("X-Broker-API-Version", "2.14")
///     .json(&serde_json::json!({"service_id": "1"}))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.headers()["content-type"], "application/json");
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Bytes,
    error: Option<String>,
}

impl TestRequestBuilder {
    /// Starts a request.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: Vec::new(),
            body: Bytes::new(),
            error: None,
        }
    }

    /// Adds a header. Repeated names are appended.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.headers
            .push((name.as_ref().to_string(), value.as_ref().to_string()));
        self
    }

    /// Sets `Content-Type`.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets a raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and `Content-Type: application/json`.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.body = Bytes::from(bytes),
            Err(e) => self.error = Some(e.to_string()),
        }
        self.content_type("application/json")
    }

    /// Builds the request.
    pub fn build(self) -> Result<Request, TestError> {
        if let Some(error) = self.error {
            return Err(TestError::RequestBuild(error));
        }

        let mut request = http::Request::new(Full::new(self.body));
        *request.method_mut() = self.method;
        *request.uri_mut() = self
            .uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("invalid URI '{}': {e}", self.uri)))?;

        for (name, value) in self.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| TestError::RequestBuild(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| TestError::RequestBuild(format!("invalid header value for {name}: {e}")))?;
            request.headers_mut().append(name, value);
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request() {
        let request = TestRequestBuilder::new(Method::GET, "/v2/catalog?x=1")
            .header("x-broker-api-version", "2.14")
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.uri().path(), "/v2/catalog");
        assert_eq!(request.headers()["x-broker-api-version"], "2.14");
    }

    #[test]
    fn test_invalid_uri() {
        let result = TestRequestBuilder::new(Method::GET, "not a uri").build();
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }

    #[test]
    fn test_invalid_header() {
        let result = TestRequestBuilder::new(Method::GET, "/")
            .header("bad header", "x")
            .build();
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }

    #[test]
    fn test_raw_body_without_content_type() {
        let request = TestRequestBuilder::new(Method::PUT, "/v2/service_instances/1")
            .body("{}")
            .build()
            .unwrap();
        assert!(request.headers().get(CONTENT_TYPE).is_none());
    }
}

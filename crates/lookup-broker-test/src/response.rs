//! Test response wrapper.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, ETAG};
use http::{HeaderMap, StatusCode};
use http_body_util::BodyExt;
use lookup_broker_middleware::Response;
use serde::de::DeserializeOwned;

use crate::error::TestError;

/// A fully read response with assertion helpers.
///
/// Assertion helpers panic with a descriptive message and return `&Self`
/// so they can be chained.
#[derive(Debug, Clone)]
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Reads a dispatcher response.
    pub async fn from_response(response: Response) -> Result<Self, TestError> {
        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| TestError::BodyRead(e.to_string()))?
            .to_bytes();

        Ok(Self::new(parts.status, parts.headers, body))
    }

    /// Creates a response from parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header as a string, if present and visible ASCII.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// The `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(CONTENT_TYPE.as_str())
    }

    /// The `ETag` header.
    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        self.header_str(ETAG.as_str())
    }

    /// Raw body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<String, TestError> {
        Ok(String::from_utf8(self.body.to_vec())?)
    }

    /// Body decoded as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as a JSON value.
    pub fn json_value(&self) -> Result<serde_json::Value, TestError> {
        self.json()
    }

    /// Asserts the status.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "expected status {expected}, got {} with body {}",
            self.status,
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Asserts a header value.
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let actual = self
            .header_str(name)
            .unwrap_or_else(|| panic!("header '{name}' not found"));
        assert_eq!(actual, expected.as_ref(), "header '{name}' mismatch");
        self
    }

    /// Asserts the media type of `Content-Type`, ignoring parameters.
    pub fn assert_content_type(&self, expected: &str) -> &Self {
        let actual = self
            .content_type()
            .unwrap_or_else(|| panic!("Content-Type header not found"));
        assert!(
            actual.starts_with(expected),
            "Content-Type: expected '{expected}', got '{actual}'"
        );
        self
    }

    /// Asserts the body contains `expected`.
    pub fn assert_body_contains(&self, expected: impl AsRef<str>) -> &Self {
        let body = String::from_utf8_lossy(&self.body);
        assert!(
            body.contains(expected.as_ref()),
            "body should contain '{}', got: {body}",
            expected.as_ref()
        );
        self
    }

    /// Asserts the JSON body.
    pub fn assert_json_eq(&self, expected: &serde_json::Value) -> &Self {
        let actual = self
            .json_value()
            .unwrap_or_else(|e| panic!("body is not JSON: {e}"));
        assert_eq!(&actual, expected, "JSON body mismatch");
        self
    }

    /// Asserts a field addressed by a dotted path, e.g.
    /// `parameters.landscapes.cf-eu10.uaa`. Numeric segments index arrays.
    pub fn assert_json_field(&self, path: &str, expected: &serde_json::Value) -> &Self {
        let json = self
            .json_value()
            .unwrap_or_else(|e| panic!("body is not JSON: {e}"));
        let actual = json_path(&json, path)
            .unwrap_or_else(|| panic!("JSON path '{path}' not found in {json}"));
        assert_eq!(actual, expected, "JSON path '{path}' mismatch");
        self
    }

    /// Asserts an OSB error envelope with `status`.
    pub fn assert_osb_error(&self, status: StatusCode) -> &Self {
        self.assert_status(status).assert_content_type("application/json");

        let json = self
            .json_value()
            .unwrap_or_else(|e| panic!("error body is not JSON: {e}"));
        assert_eq!(
            json["error"].as_str(),
            status.canonical_reason(),
            "OSB error reason mismatch in {json}"
        );
        assert!(
            json["description"].is_string(),
            "OSB error has no description: {json}"
        );
        self
    }
}

fn json_path<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match segment.parse::<usize>() {
            Ok(index) if current.is_array() => current.get(index),
            _ => current.get(segment),
        })
}

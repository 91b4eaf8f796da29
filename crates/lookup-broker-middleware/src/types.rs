//! Request/response aliases and the error responder.
//!
//! [`ResponseExt`] is the only way the broker builds responses. Every
//! failure goes through [`ResponseExt::broker_error`] or
//! [`ResponseExt::osb_error`], which always produce
//! `Content-Type: application/json` and an [`OsbError`] body.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use http_body_util::Full;
use lookup_broker_core::protocol::{CONTENT_TYPE_JSON, CONTENT_TYPE_TEXT};
use lookup_broker_core::{BrokerError, OsbError};
use serde::Serialize;

/// The HTTP request type used in the pipeline.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type used in the pipeline.
pub type Response = http::Response<Full<Bytes>>;

/// Response constructors.
pub trait ResponseExt: Sized {
    /// A response with `status` and the given body and content type.
    fn with_body(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Self;

    /// A JSON response. Serialization failures become a 500 OSB error.
    fn json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Self;

    /// A plain-text response.
    fn text(status: StatusCode, body: impl Into<Bytes>) -> Self;

    /// A response with no body.
    fn empty(status: StatusCode) -> Self;

    /// An OSB error envelope for `status` with `description`.
    fn osb_error(status: StatusCode, description: &str) -> Self;

    /// The OSB error envelope for a broker error.
    fn broker_error(err: &BrokerError) -> Self;
}

impl ResponseExt for Response {
    fn with_body(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Self {
        let mut response = http::Response::new(Full::new(body.into()));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        response
    }

    fn json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => Self::with_body(status, CONTENT_TYPE_JSON, bytes),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response body");
                Self::broker_error(&BrokerError::from(e))
            }
        }
    }

    fn text(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::with_body(status, CONTENT_TYPE_TEXT, body)
    }

    fn empty(status: StatusCode) -> Self {
        let mut response = http::Response::new(Full::new(Bytes::new()));
        *response.status_mut() = status;
        response
    }

    fn osb_error(status: StatusCode, description: &str) -> Self {
        let envelope = OsbError::new(status, description);
        // OsbError holds only strings and bools.
        let body = serde_json::to_vec(&envelope).unwrap_or_default();
        Self::with_body(status, CONTENT_TYPE_JSON, body)
    }

    fn broker_error(err: &BrokerError) -> Self {
        Self::osb_error(err.status_code(), &err.to_string())
    }
}

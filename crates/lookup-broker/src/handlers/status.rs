//! Unversioned endpoints and the not-implemented fallback.

use http::StatusCode;
use lookup_broker_core::{BrokerError, BrokerResult};
use lookup_broker_middleware::{Response, ResponseExt};

/// Plain-text body of `GET /`.
pub const BANNER: &str = "Lookup-Broker";

/// `GET /health`
pub async fn health() -> BrokerResult<Response> {
    super::json_response(StatusCode::OK, &serde_json::json!({"ok": true}))
}

/// `GET /`
pub async fn home() -> BrokerResult<Response> {
    Ok(Response::text(StatusCode::OK, BANNER))
}

/// Fails with 501 for an operation the broker does not offer.
pub async fn not_implemented(operation: &'static str) -> BrokerResult<Response> {
    Err(BrokerError::NotImplemented(operation.to_string()))
}

//! Resource handlers.
//!
//! Every handler returns [`BrokerResult`]; the dispatcher renders errors as
//! OSB envelopes.

pub mod binding;
pub mod catalog;
pub mod instance;
pub mod status;

use http::StatusCode;
use http_body_util::BodyExt;
use lookup_broker_core::protocol::CONTENT_TYPE_JSON;
use lookup_broker_core::{BrokerError, BrokerResult};
use lookup_broker_middleware::{Request, Response, ResponseExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Decodes the request body as JSON. Malformed bodies are a 400.
pub(crate) async fn read_json<T: DeserializeOwned>(request: Request) -> BrokerResult<T> {
    let body = match request.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(never) => match never {},
    };
    serde_json::from_slice(&body).map_err(|e| BrokerError::invalid_body(&e))
}

/// Serializes `body`, failing with a 500 instead of falling back silently.
pub(crate) fn json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    body: &T,
) -> BrokerResult<Response> {
    let bytes = serde_json::to_vec(body)?;
    Ok(Response::with_body(status, CONTENT_TYPE_JSON, bytes))
}

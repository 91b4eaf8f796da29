//! Service binding lifecycle.
//!
//! Bindings hand the landscape directory to the bound application. The
//! directory is read from the source on every request.

use std::sync::Arc;

use http::StatusCode;
use lookup_broker_core::binding::{
    ServiceBindingRequest, ServiceBindingResource, ServiceBindingResponse,
};
use lookup_broker_core::{BrokerResult, LandscapeSource};
use lookup_broker_middleware::{Request, Response};
use lookup_broker_server::RouteMatch;

use super::{json_response, read_json};

/// `PUT .../service_bindings/{bid}`: answers 201 with the directory as
/// `credentials.landscapes`.
pub async fn put_binding(
    landscapes: Arc<dyn LandscapeSource>,
    route: RouteMatch,
    request: Request,
) -> BrokerResult<Response> {
    let body: ServiceBindingRequest = read_json(request).await?;
    body.validate()?;

    let directory = landscapes.get_all();
    tracing::info!(
        instance_id = route.param("id").unwrap_or_default(),
        binding_id = route.param("bid").unwrap_or_default(),
        landscapes = directory.len(),
        "service binding created"
    );
    json_response(StatusCode::CREATED, &ServiceBindingResponse::new(directory))
}

/// `GET .../service_bindings/{bid}`: answers 200 with the directory as
/// `parameters.landscapes`.
pub async fn get_binding(
    landscapes: Arc<dyn LandscapeSource>,
    route: RouteMatch,
) -> BrokerResult<Response> {
    let directory = landscapes.get_all();
    tracing::debug!(
        binding_id = route.param("bid").unwrap_or_default(),
        landscapes = directory.len(),
        "service binding fetched"
    );
    json_response(StatusCode::OK, &ServiceBindingResource::new(directory))
}

/// `DELETE .../service_bindings/{bid}`
pub async fn delete_binding(route: RouteMatch) -> BrokerResult<Response> {
    tracing::info!(
        binding_id = route.param("bid").unwrap_or_default(),
        "service binding deleted"
    );
    json_response(StatusCode::OK, &serde_json::json!({}))
}

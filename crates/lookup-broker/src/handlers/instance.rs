//! Service instance lifecycle.
//!
//! Provisioning only validates the request envelope; the broker keeps no
//! instance state.

use http::StatusCode;
use lookup_broker_core::instance::{
    ServiceInstanceProvisionResponse, ServiceInstanceRequest, ServiceInstanceResource,
    ServiceInstanceUpdateRequest,
};
use lookup_broker_core::BrokerResult;
use lookup_broker_middleware::{Request, Response};
use lookup_broker_server::RouteMatch;

use super::{json_response, read_json};

fn instance_id(route: &RouteMatch) -> &str {
    route.param("id").unwrap_or_default()
}

/// `PUT /v2/service_instances/{id}`: validates and answers 201 `{}`.
pub async fn put_instance(route: RouteMatch, request: Request) -> BrokerResult<Response> {
    let body: ServiceInstanceRequest = read_json(request).await?;
    body.validate()?;

    tracing::info!(
        instance_id = instance_id(&route),
        organization_guid = body.organization_guid().unwrap_or_default(),
        space_guid = body.space_guid().unwrap_or_default(),
        "service instance provisioned"
    );
    json_response(StatusCode::CREATED, &ServiceInstanceProvisionResponse::default())
}

/// `GET /v2/service_instances/{id}`
pub async fn get_instance(route: RouteMatch) -> BrokerResult<Response> {
    tracing::debug!(instance_id = instance_id(&route), "service instance fetched");
    json_response(StatusCode::OK, &ServiceInstanceResource::default())
}

/// `PATCH /v2/service_instances/{id}`: echoes the decoded update.
pub async fn patch_instance(route: RouteMatch, request: Request) -> BrokerResult<Response> {
    let update: ServiceInstanceUpdateRequest = read_json(request).await?;
    tracing::info!(
        instance_id = instance_id(&route),
        plan_id = update.plan_id.as_deref().unwrap_or_default(),
        "service instance updated"
    );
    json_response(StatusCode::OK, &update)
}

/// `DELETE /v2/service_instances/{id}`
pub async fn delete_instance(route: RouteMatch) -> BrokerResult<Response> {
    tracing::info!(instance_id = instance_id(&route), "service instance deprovisioned");
    json_response(StatusCode::OK, &serde_json::json!({}))
}

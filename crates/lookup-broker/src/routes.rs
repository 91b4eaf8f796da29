//! The broker's route table and pipelines.
//!
//! OSB routes live under `/v2` and run through the protocol stages:
//! request log, API version gate, request identity, originating identity
//! and ETag. `/health` and `/` only get the request log.

use std::sync::Arc;

use http::Method;
use lookup_broker_core::protocol::CONTENT_TYPE_JSON;
use lookup_broker_core::LandscapeSource;
use lookup_broker_middleware::stages::{
    ApiVersionMiddleware, EtagMiddleware, OriginatingIdentityMiddleware,
    RequestIdentityMiddleware, RequestLogMiddleware,
};
use lookup_broker_middleware::Pipeline;
use lookup_broker_server::{Dispatcher, HandlerRegistry, Router};

use crate::handlers::{binding, catalog, instance, status};

/// Prefix of the OSB API.
pub const OSB_PREFIX: &str = "/v2";

/// Operation ids.
pub mod operations {
    /// `GET /v2/catalog`
    pub const CATALOG: &str = "v2.catalog";
    /// `PUT /v2/service_instances/{id}`
    pub const INSTANCE_PUT: &str = "v2.instance.put";
    /// `GET /v2/service_instances/{id}`
    pub const INSTANCE_GET: &str = "v2.instance.get";
    /// `PATCH /v2/service_instances/{id}`
    pub const INSTANCE_PATCH: &str = "v2.instance.patch";
    /// `DELETE /v2/service_instances/{id}`
    pub const INSTANCE_DELETE: &str = "v2.instance.delete";
    /// `GET /v2/service_instances/{id}/last_operation`
    pub const INSTANCE_LAST_OPERATION: &str = "v2.instance.last_operation";
    /// `PUT /v2/service_instances/{id}/service_bindings/{bid}`
    pub const BINDING_PUT: &str = "v2.binding.put";
    /// `GET /v2/service_instances/{id}/service_bindings/{bid}`
    pub const BINDING_GET: &str = "v2.binding.get";
    /// `DELETE /v2/service_instances/{id}/service_bindings/{bid}`
    pub const BINDING_DELETE: &str = "v2.binding.delete";
    /// `GET /v2/service_instances/{id}/service_bindings/{bid}/last_operation`
    pub const BINDING_LAST_OPERATION: &str = "v2.binding.last_operation";
    /// `GET /health`
    pub const HEALTH: &str = "health";
    /// `GET /`
    pub const HOME: &str = "home";
}

const INSTANCE: &str = "/v2/service_instances/{id}";
const BINDING: &str = "/v2/service_instances/{id}/service_bindings/{bid}";

/// Builds the route table.
#[must_use]
pub fn router() -> Router {
    use operations as op;

    let mut router = Router::new();
    router.add_route(Method::GET, "/v2/catalog", op::CATALOG);

    router.add_route_consuming(Method::PUT, INSTANCE, op::INSTANCE_PUT, CONTENT_TYPE_JSON);
    router.add_route(Method::GET, INSTANCE, op::INSTANCE_GET);
    router.add_route_consuming(Method::PATCH, INSTANCE, op::INSTANCE_PATCH, CONTENT_TYPE_JSON);
    router.add_route(Method::DELETE, INSTANCE, op::INSTANCE_DELETE);
    router.add_route(
        Method::GET,
        "/v2/service_instances/{id}/last_operation",
        op::INSTANCE_LAST_OPERATION,
    );

    router.add_route_consuming(Method::PUT, BINDING, op::BINDING_PUT, CONTENT_TYPE_JSON);
    router.add_route(Method::GET, BINDING, op::BINDING_GET);
    router.add_route(Method::DELETE, BINDING, op::BINDING_DELETE);
    router.add_route(
        Method::GET,
        "/v2/service_instances/{id}/service_bindings/{bid}/last_operation",
        op::BINDING_LAST_OPERATION,
    );

    router.add_route(Method::GET, "/health", op::HEALTH);
    router.add_route(Method::GET, "/", op::HOME);
    router
}

/// Registers every handler. Binding handlers read `landscapes` per request.
#[must_use]
pub fn handlers(landscapes: Arc<dyn LandscapeSource>) -> HandlerRegistry {
    use operations as op;

    let mut handlers = HandlerRegistry::new();
    handlers.register(op::CATALOG, |_route, _request| catalog::get_catalog());

    handlers.register(op::INSTANCE_PUT, instance::put_instance);
    handlers.register(op::INSTANCE_GET, |route, _request| instance::get_instance(route));
    handlers.register(op::INSTANCE_PATCH, instance::patch_instance);
    handlers.register(op::INSTANCE_DELETE, |route, _request| {
        instance::delete_instance(route)
    });
    handlers.register(op::INSTANCE_LAST_OPERATION, |_route, _request| {
        status::not_implemented(op::INSTANCE_LAST_OPERATION)
    });

    let source = Arc::clone(&landscapes);
    handlers.register(op::BINDING_PUT, move |route, request| {
        binding::put_binding(Arc::clone(&source), route, request)
    });
    let source = landscapes;
    handlers.register(op::BINDING_GET, move |route, _request| {
        binding::get_binding(Arc::clone(&source), route)
    });
    handlers.register(op::BINDING_DELETE, |route, _request| {
        binding::delete_binding(route)
    });
    handlers.register(op::BINDING_LAST_OPERATION, |_route, _request| {
        status::not_implemented(op::BINDING_LAST_OPERATION)
    });

    handlers.register(op::HEALTH, |_route, _request| status::health());
    handlers.register(op::HOME, |_route, _request| status::home());
    handlers
}

/// The stages every `/v2` request passes, in order.
#[must_use]
pub fn osb_pipeline(supported_api_version: &str, landscapes: Arc<dyn LandscapeSource>) -> Pipeline {
    Pipeline::builder()
        .stage(RequestLogMiddleware::new())
        .stage(ApiVersionMiddleware::new(supported_api_version))
        .stage(RequestIdentityMiddleware::new())
        .stage(OriginatingIdentityMiddleware::new())
        .stage(EtagMiddleware::new(landscapes))
        .build()
}

/// Assembles the broker's dispatcher.
///
/// ```
/// use std::sync::Arc;
/// use lookup_broker::build_dispatcher;
/// use lookup_broker_core::fixtures;
///
/// let dispatcher = build_dispatcher("2.14", Arc::new(fixtures::landscape_source()));
/// assert_eq!(
///     dispatcher.pipeline_for("/v2/catalog").stage_names(),
///     ["request_log", "api_version", "request_identity", "originating_identity", "etag"]
/// );
/// assert_eq!(dispatcher.pipeline_for("/health").stage_names(), ["request_log"]);
/// ```
#[must_use]
pub fn build_dispatcher(
    supported_api_version: &str,
    landscapes: Arc<dyn LandscapeSource>,
) -> Dispatcher {
    Dispatcher::builder()
        .router(router())
        .handlers(handlers(Arc::clone(&landscapes)))
        .scope(OSB_PREFIX, osb_pipeline(supported_api_version, landscapes))
        .default_pipeline(
            Pipeline::builder()
                .stage(RequestLogMiddleware::new())
                .build(),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookup_broker_core::fixtures;

    #[test]
    fn test_every_route_has_a_handler() {
        let router = router();
        let handlers = handlers(Arc::new(fixtures::landscape_source()));

        for operation in router.operation_ids() {
            assert!(handlers.contains(operation), "no handler for {operation}");
        }
        assert_eq!(router.route_count(), handlers.len());
    }

    #[test]
    fn test_json_routes_require_content_type() {
        let router = router();

        let put = router
            .match_route(&Method::PUT, "/v2/service_instances/abc")
            .unwrap();
        assert_eq!(put.operation_id(), operations::INSTANCE_PUT);
        assert_eq!(put.content_type(), Some(CONTENT_TYPE_JSON));
        assert_eq!(put.param("id"), Some("abc"));

        let get = router
            .match_route(&Method::GET, "/v2/service_instances/abc")
            .unwrap();
        assert_eq!(get.content_type(), None);
    }

    #[test]
    fn test_last_operation_is_not_a_binding_id() {
        let route = router()
            .match_route(&Method::GET, "/v2/service_instances/abc/last_operation")
            .unwrap();
        assert_eq!(route.operation_id(), operations::INSTANCE_LAST_OPERATION);

        let route = router()
            .match_route(
                &Method::GET,
                "/v2/service_instances/abc/service_bindings/def/last_operation",
            )
            .unwrap();
        assert_eq!(route.operation_id(), operations::BINDING_LAST_OPERATION);
    }

    #[test]
    fn test_catalog_post_unrouted() {
        let router = router();
        assert!(router.match_route(&Method::POST, "/v2/catalog").is_none());
        assert_eq!(router.allowed_methods("/v2/catalog"), vec![Method::GET]);
    }
}

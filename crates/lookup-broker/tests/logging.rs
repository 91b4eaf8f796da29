//! Diagnostic logging of the protocol headers.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::StatusCode;
use lookup_broker::build_dispatcher;
use lookup_broker_core::fixtures;
use lookup_broker_core::protocol::{
    API_VERSION_HEADER_NAME, ORIGINATING_IDENTITY_HEADER_NAME, REQUEST_IDENTITY_HEADER_NAME,
};
use lookup_broker_test::TestClient;
use tracing_test::traced_test;

fn client() -> TestClient {
    TestClient::new(build_dispatcher("2.14", Arc::new(fixtures::landscape_source())))
        .with_default_header(API_VERSION_HEADER_NAME, "2.14")
}

#[tokio::test]
#[traced_test]
async fn test_originating_identity_logged() {
    client()
        .get("/v2/catalog")
        .header(ORIGINATING_IDENTITY_HEADER_NAME, fixtures::ORIGINATING_IDENTITY)
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert!(logs_contain("cloudfoundry"));
    assert!(logs_contain(fixtures::ORIGINATING_USER_ID));
}

#[tokio::test]
#[traced_test]
async fn test_originating_identity_encoded_here() {
    let user_id = "0b6d1c9e-2f0a-4c55-9a51-6c7d1e2f3a4b";
    let encoded = STANDARD.encode(format!(r#"{{"user_id":"{user_id}"}}"#));

    client()
        .get("/v2/catalog")
        .header(ORIGINATING_IDENTITY_HEADER_NAME, format!("cloudfoundry {encoded}"))
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert!(logs_contain(user_id));
}

#[tokio::test]
#[traced_test]
async fn test_malformed_originating_identity_does_not_fail_request() {
    client()
        .get("/v2/service_instances/abc/service_bindings/def")
        .header(ORIGINATING_IDENTITY_HEADER_NAME, "cloudfoundry %%%not-base64%%%")
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert!(logs_contain("invalid X-Broker-API-Originating-Identity header"));
}

#[tokio::test]
#[traced_test]
async fn test_request_identity_logged() {
    client()
        .get("/v2/catalog")
        .header(REQUEST_IDENTITY_HEADER_NAME, fixtures::REQUEST_IDENTITY)
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert!(logs_contain(fixtures::REQUEST_IDENTITY));
}

#[tokio::test]
#[traced_test]
async fn test_missing_identity_headers_logged() {
    client()
        .get("/v2/catalog")
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert!(logs_contain("X-Broker-API-Request-Identity not set"));
}

#[tokio::test]
#[traced_test]
async fn test_provision_logged() {
    client()
        .put("/v2/service_instances/inst-1")
        .json(&serde_json::json!({
            "service_id": "1",
            "plan_id": "1.1",
            "context": {"organization_guid": "org-1", "space_guid": "space-1"}
        }))
        .send()
        .await
        .unwrap()
        .assert_status(StatusCode::CREATED);

    assert!(logs_contain("service instance provisioned"));
    assert!(logs_contain("inst-1"));
}

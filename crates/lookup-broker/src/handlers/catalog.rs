//! `GET /v2/catalog`

use http::StatusCode;
use lookup_broker_core::catalog::catalog;
use lookup_broker_core::BrokerResult;
use lookup_broker_middleware::Response;

use super::json_response;

/// Returns the static catalog.
pub async fn get_catalog() -> BrokerResult<Response> {
    let catalog = catalog();
    if tracing::enabled!(tracing::Level::DEBUG) {
        if let Ok(json) = serde_json::to_string(catalog) {
            tracing::debug!(catalog = %json, "serving catalog");
        }
    }
    json_response(StatusCode::OK, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use lookup_broker_core::catalog::{PLAN_ID, SERVICE_ID};

    #[tokio::test]
    async fn test_catalog_response() {
        let response = get_catalog().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["services"][0]["id"], SERVICE_ID);
        assert_eq!(json["services"][0]["plans"][0]["id"], PLAN_ID);
    }
}

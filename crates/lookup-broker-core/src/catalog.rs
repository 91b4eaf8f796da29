//! The broker's service catalog.
//!
//! The catalog never varies at runtime, so it is a single `static` value
//! built from `const` parts. Handlers serialize [`catalog()`] directly.

use serde::{Deserialize, Serialize};

use crate::error::BrokerError;

/// Id of the only service offered.
pub const SERVICE_ID: &str = "1";

/// Id of the only plan offered.
pub const PLAN_ID: &str = "1.1";

/// The catalog document returned by `GET /v2/catalog`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Catalog {
    /// Offered services.
    pub services: &'static [Service],
}

/// A service offering.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Service {
    /// Service id.
    pub id: &'static str,
    /// CLI-friendly service name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Free-form tags.
    pub tags: &'static [&'static str],
    /// Required platform permissions.
    pub requires: &'static [&'static str],
    /// Whether instances can be bound.
    pub bindable: bool,
    /// Whether `GET` on instances is supported.
    pub instances_retrievable: bool,
    /// Whether `GET` on bindings is supported.
    pub bindings_retrievable: bool,
    /// Whether context updates are accepted.
    pub allow_context_updates: bool,
    /// Opaque service metadata.
    pub metadata: ServiceMetadata,
    /// Dashboard SSO client.
    pub dashboard_client: DashboardClient,
    /// Whether plan changes are supported.
    pub plan_updateable: bool,
    /// Plans of this service.
    pub plans: &'static [Plan],
}

/// Service metadata (always empty).
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ServiceMetadata {}

/// Dashboard client credentials.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DashboardClient {
    /// OAuth client id.
    pub id: &'static str,
    /// Redirect URI for the dashboard.
    pub redirect_uri: &'static str,
    /// OAuth client secret.
    pub secret: &'static str,
}

/// A plan of a service.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Plan {
    /// Plan id.
    pub id: &'static str,
    /// CLI-friendly plan name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Plan metadata.
    pub metadata: PlanMetadata,
    /// Whether the plan is free.
    pub free: bool,
    /// Whether instances of this plan can be bound.
    pub bindable: bool,
    /// Whether plan changes are supported.
    pub plan_updateable: bool,
    /// Parameter schemas (none published).
    pub schemas: Schemas,
    /// Upper bound for last-operation polling, in seconds.
    pub maximum_polling_duration: u32,
    /// Maintenance level of the plan.
    pub maintenance_info: PlanMaintenanceInfo,
}

/// Plan metadata.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlanMetadata {
    /// Display labels.
    pub labels: &'static [&'static str],
}

/// Parameter schemas of a plan.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Schemas {}

/// Maintenance level published in the catalog.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlanMaintenanceInfo {
    /// Semantic version of the maintenance level.
    pub version: &'static str,
}

/// Maintenance information carried by request payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceInfo {
    /// Semantic version of the maintenance level.
    pub version: String,

    /// Description of the maintenance level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

const EXTENSION_PLAN: Plan = Plan {
    id: PLAN_ID,
    name: "extension",
    description: "Topology lookup for Cloud Foundry extension landscapes",
    metadata: PlanMetadata { labels: &[] },
    free: true,
    bindable: true,
    plan_updateable: true,
    schemas: Schemas {},
    maximum_polling_duration: 10,
    maintenance_info: PlanMaintenanceInfo { version: "0.0.0" },
};

const LOOKUP_SERVICE: Service = Service {
    id: SERVICE_ID,
    name: "lookup",
    description: "Lookup service broker",
    tags: &["cf", "api", "cloudfoundry", "cloud controler", "uaa"],
    requires: &[],
    bindable: true,
    instances_retrievable: true,
    bindings_retrievable: true,
    allow_context_updates: true,
    metadata: ServiceMetadata {},
    dashboard_client: DashboardClient {
        id: "lookupDashboardClientId",
        redirect_uri: "",
        secret: "admin",
    },
    plan_updateable: true,
    plans: &[EXTENSION_PLAN],
};

/// The broker catalog.
pub static CATALOG: Catalog = Catalog {
    services: &[LOOKUP_SERVICE],
};

/// Returns the broker catalog.
#[must_use]
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

/// Checks that a payload targets the catalog's service and plan.
pub fn check_catalog_ids(service_id: &str, plan_id: &str) -> Result<(), BrokerError> {
    if service_id != SERVICE_ID {
        return Err(BrokerError::UnsupportedServiceId(service_id.to_string()));
    }
    if plan_id != PLAN_ID {
        return Err(BrokerError::UnsupportedPlanId(plan_id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_document() {
        let value = serde_json::to_value(catalog()).unwrap();

        let expected = json!({
            "services": [{
                "id": "1",
                "name": "lookup",
                "description": "Lookup service broker",
                "tags": ["cf", "api", "cloudfoundry", "cloud controler", "uaa"],
                "requires": [],
                "bindable": true,
                "instances_retrievable": true,
                "bindings_retrievable": true,
                "allow_context_updates": true,
                "metadata": {},
                "dashboard_client": {
                    "id": "lookupDashboardClientId",
                    "redirect_uri": "",
                    "secret": "admin"
                },
                "plan_updateable": true,
                "plans": [{
                    "id": "1.1",
                    "name": "extension",
                    "description": "Topology lookup for Cloud Foundry extension landscapes",
                    "metadata": {"labels": []},
                    "free": true,
                    "bindable": true,
                    "plan_updateable": true,
                    "schemas": {},
                    "maximum_polling_duration": 10,
                    "maintenance_info": {"version": "0.0.0"}
                }]
            }]
        });

        assert_eq!(value, expected);
    }

    #[test]
    fn test_check_catalog_ids() {
        assert!(check_catalog_ids("1", "1.1").is_ok());
        assert_eq!(
            check_catalog_ids("", "1.1"),
            Err(BrokerError::UnsupportedServiceId(String::new()))
        );
        assert_eq!(
            check_catalog_ids("1", "2"),
            Err(BrokerError::UnsupportedPlanId("2".into()))
        );
    }

    #[test]
    fn test_service_id_checked_before_plan_id() {
        assert_eq!(
            check_catalog_ids("x", "y"),
            Err(BrokerError::UnsupportedServiceId("x".into()))
        );
    }

    #[test]
    fn test_maintenance_info_decodes() {
        let info: MaintenanceInfo =
            serde_json::from_str(r#"{"version":"1.2.3","description":"patch"}"#).unwrap();
        assert_eq!(info.version, "1.2.3");
        assert_eq!(info.description.as_deref(), Some("patch"));
    }
}

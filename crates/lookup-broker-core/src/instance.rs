//! Service instance payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{check_catalog_ids, MaintenanceInfo};
use crate::error::BrokerError;

/// Body of `PUT /v2/service_instances/{id}`.
///
/// Missing string fields decode as empty strings so that validation, not
/// decoding, reports them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstanceRequest {
    /// Catalog service id.
    #[serde(default)]
    pub service_id: String,

    /// Catalog plan id.
    #[serde(default)]
    pub plan_id: String,

    /// Platform specific context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,

    /// Deprecated top-level organization guid.
    #[serde(default)]
    pub organization_guid: String,

    /// Deprecated top-level space guid.
    #[serde(default)]
    pub space_guid: String,

    /// Configuration parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,

    /// Values before an update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_values: Option<PreviousValues>,

    /// Requested maintenance level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_info: Option<MaintenanceInfo>,
}

impl ServiceInstanceRequest {
    /// Returns the organization guid, preferring the top-level field.
    pub fn organization_guid(&self) -> Option<&str> {
        non_empty(&self.organization_guid).or_else(|| self.context_str("organization_guid"))
    }

    /// Returns the space guid, preferring the top-level field.
    pub fn space_guid(&self) -> Option<&str> {
        non_empty(&self.space_guid).or_else(|| self.context_str("space_guid"))
    }

    fn context_str(&self, key: &str) -> Option<&str> {
        self.context
            .as_ref()
            .and_then(|ctx| ctx.get(key))
            .and_then(Value::as_str)
            .and_then(non_empty)
    }

    /// Validates the request envelope. The first failing check wins:
    /// service id, plan id, organization guid, space guid.
    pub fn validate(&self) -> Result<(), BrokerError> {
        check_catalog_ids(&self.service_id, &self.plan_id)?;

        if self.organization_guid().is_none() {
            return Err(BrokerError::MissingOrganizationGuid);
        }
        if self.space_guid().is_none() {
            return Err(BrokerError::MissingSpaceGuid);
        }

        Ok(())
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Body of `PATCH /v2/service_instances/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstanceUpdateRequest {
    /// Platform specific context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,

    /// Catalog service id.
    pub service_id: String,

    /// Target plan id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,

    /// Configuration parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,

    /// Values before the update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_values: Option<PreviousValues>,

    /// Requested maintenance level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_info: Option<MaintenanceInfo>,
}

/// Values of an instance before an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviousValues {
    /// Previous service id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,

    /// Previous plan id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,

    /// Previous organization id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    /// Previous space id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,

    /// Previous maintenance level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_info: Option<MaintenanceInfo>,
}

/// Response of a synchronous provision. Empty for this broker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstanceProvisionResponse {
    /// Dashboard URL of the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,

    /// Operation token for asynchronous provisioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

/// Response of `GET /v2/service_instances/{id}`. Empty for this broker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstanceResource {
    /// Service id of the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,

    /// Plan id of the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,

    /// Dashboard URL of the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,

    /// Parameters of the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

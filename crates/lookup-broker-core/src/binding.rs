//! Service binding payloads.
//!
//! Binding is where the broker delivers its value: the landscape directory
//! is handed to the bound application.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::check_catalog_ids;
use crate::error::BrokerError;
use crate::landscape::LandscapeDirectory;

/// Body of `PUT /v2/service_instances/{id}/service_bindings/{bid}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceBindingRequest {
    /// Catalog service id.
    #[serde(default)]
    pub service_id: String,

    /// Catalog plan id.
    #[serde(default)]
    pub plan_id: String,

    /// Platform specific context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,

    /// Deprecated application guid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_guid: Option<String>,

    /// Resource the binding is created for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_resource: Option<Map<String, Value>>,

    /// Configuration parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

impl ServiceBindingRequest {
    /// Checks that the binding targets the catalog's service and plan.
    pub fn validate(&self) -> Result<(), BrokerError> {
        check_catalog_ids(&self.service_id, &self.plan_id)
    }
}

/// The landscape directory keyed as `landscapes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandscapeParameters {
    /// Every known landscape.
    pub landscapes: LandscapeDirectory,
}

/// Response of `GET .../service_bindings/{bid}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBindingResource {
    /// Binding parameters, carrying the landscape directory.
    pub parameters: LandscapeParameters,
}

impl ServiceBindingResource {
    /// Creates a resource exposing `landscapes`.
    #[must_use]
    pub fn new(landscapes: LandscapeDirectory) -> Self {
        Self {
            parameters: LandscapeParameters { landscapes },
        }
    }
}

/// Response of `PUT .../service_bindings/{bid}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBindingResponse {
    /// Credentials injected into the bound application.
    pub credentials: LandscapeParameters,

    /// Operation token for asynchronous binding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

impl ServiceBindingResponse {
    /// Creates a response whose credentials carry `landscapes`.
    #[must_use]
    pub fn new(landscapes: LandscapeDirectory) -> Self {
        Self {
            credentials: LandscapeParameters { landscapes },
            operation: None,
        }
    }
}

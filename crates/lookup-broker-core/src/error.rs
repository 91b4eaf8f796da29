//! Broker error taxonomy and the OSB error envelope.
//!
//! Every failure the broker reports to a platform is a [`BrokerError`]. Each
//! variant maps to exactly one HTTP status and renders as an [`OsbError`]:
//!
//! | Category | Status |
//! |----------|--------|
//! | Protocol precondition (API version) | 412 |
//! | Request validation | 400 |
//! | Request body over the size limit | 413 |
//! | Routing | 404 / 405 / 415 |
//! | Unimplemented operation | 501 |
//! | Timeout | 504 |
//! | Serialization / internal | 500 |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::API_VERSION_HEADER_NAME;

/// Result type alias for broker operations.
pub type BrokerResult<T> = Result<T, BrokerError>;

/// The canonical OSB error body.
///
/// ```
/// use http::StatusCode;
/// use lookup_broker_core::OsbError;
///
/// let body = OsbError::new(StatusCode::BAD_REQUEST, "unsupported plan id: 2");
/// assert_eq!(body.error, "Bad Request");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsbError {
    /// Standard reason phrase of the response status.
    pub error: String,

    /// Human readable failure detail.
    pub description: String,

    /// Whether the instance is still usable after the failed operation.
    #[serde(default)]
    pub instance_usable: bool,

    /// Whether repeating the update would be meaningful.
    #[serde(default)]
    pub update_repeatable: bool,
}

impl OsbError {
    /// Creates an envelope for `status` with the given description.
    #[must_use]
    pub fn new(status: StatusCode, description: impl Into<String>) -> Self {
        Self {
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            description: description.into(),
            instance_usable: false,
            update_repeatable: false,
        }
    }
}

/// Errors surfaced by the broker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// The `X-Broker-API-Version` header is absent or empty.
    #[error("HTTP Status: (412) - mandatory request header {header} not set", header = API_VERSION_HEADER_NAME)]
    MissingApiVersion,

    /// The requested major API version differs from the supported one.
    #[error("HTTP Status: (412) - requested API version is {requested} but supported API version is {supported}")]
    ApiVersionMismatch {
        /// Raw header value sent by the platform.
        requested: String,
        /// Full supported version, e.g. `2.14`.
        supported: String,
    },

    /// The request body is not valid JSON of the expected shape.
    #[error("{0}")]
    InvalidBody(String),

    /// The request body could not be read from the connection.
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    /// The request body exceeds the configured size limit.
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },

    /// `service_id` does not name the catalog service.
    #[error("unsupported service id: {0}")]
    UnsupportedServiceId(String),

    /// `plan_id` does not name the catalog plan.
    #[error("unsupported plan id: {0}")]
    UnsupportedPlanId(String),

    /// Neither the payload nor its context carries an organization guid.
    #[error("organization_guid missing")]
    MissingOrganizationGuid,

    /// Neither the payload nor its context carries a space guid.
    #[error("space_guid missing")]
    MissingSpaceGuid,

    /// No route matches the request method and path.
    #[error("no route for {method} {path}")]
    RouteNotFound {
        /// Request method.
        method: String,
        /// Request path.
        path: String,
    },

    /// The path is routed, but not for this method.
    #[error("method {method} not allowed for {path}")]
    MethodNotAllowed {
        /// Request method.
        method: String,
        /// Request path.
        path: String,
    },

    /// The route requires a content type the request did not send.
    #[error("unsupported content type, expected {expected}")]
    UnsupportedMediaType {
        /// Required content type.
        expected: String,
    },

    /// The operation is routed but intentionally not implemented.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// A response document could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Any other internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BrokerError {
    /// Creates an invalid-body error from a JSON decode failure.
    pub fn invalid_body(err: &serde_json::Error) -> Self {
        Self::InvalidBody(err.to_string())
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingApiVersion | Self::ApiVersionMismatch { .. } => {
                StatusCode::PRECONDITION_FAILED
            }
            Self::InvalidBody(_)
            | Self::BodyRead(_)
            | Self::UnsupportedServiceId(_)
            | Self::UnsupportedPlanId(_)
            | Self::MissingOrganizationGuid
            | Self::MissingSpaceGuid => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Serialization(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Renders this error as an OSB envelope.
    #[must_use]
    pub fn to_osb_error(&self) -> OsbError {
        OsbError::new(self.status_code(), self.to_string())
    }
}

impl From<serde_json::Error> for BrokerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

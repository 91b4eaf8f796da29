//! Originating identity parsing.
//!
//! The `X-Broker-API-Originating-Identity` header has the form
//! `<platform> <base64(json)>`. For Cloud Foundry the JSON object carries a
//! `user_id`. Parsing is a pure function; callers decide what a failure
//! means (the broker only logs it).

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decoded identity payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserId {
    /// Platform user id.
    #[serde(default)]
    pub user_id: String,
}

/// The identity of the user on whose behalf the platform calls the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginatingIdentity {
    /// Platform name, e.g. `cloudfoundry`.
    pub platform: String,

    /// Decoded user id object.
    pub user_id: UserId,
}

impl fmt::Display for OriginatingIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "platform={} user_id={}", self.platform, self.user_id.user_id)
    }
}

/// Why an originating identity header could not be parsed.
#[derive(Debug, Error)]
pub enum IdentityParseError {
    /// The header value is empty.
    #[error("originating identity header is empty")]
    Empty,

    /// No space separates platform and payload.
    #[error("originating identity header has no payload: {0}")]
    MissingPayload(String),

    /// The payload is not valid base64.
    #[error("user_id not base64 encoded: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded payload is not the expected JSON object.
    #[error("user_id payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses an originating identity header value.
///
/// ```
/// use lookup_broker_core::parse_originating_identity;
///
/// // base64 of {"user_id":"42"}
/// let identity = parse_originating_identity("cloudfoundry eyJ1c2VyX2lkIjoiNDIifQ==").unwrap();
/// assert_eq!(identity.platform, "cloudfoundry");
/// assert_eq!(identity.user_id.user_id, "42");
/// ```
pub fn parse_originating_identity(value: &str) -> Result<OriginatingIdentity, IdentityParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(IdentityParseError::Empty);
    }

    let (platform, payload) = value
        .split_once(' ')
        .ok_or_else(|| IdentityParseError::MissingPayload(value.to_string()))?;

    let decoded = STANDARD.decode(payload.trim())?;
    let user_id: UserId = serde_json::from_slice(&decoded)?;

    Ok(OriginatingIdentity {
        platform: platform.to_string(),
        user_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_parse_cloudfoundry_identity() {
        let identity = parse_originating_identity(fixtures::ORIGINATING_IDENTITY).unwrap();
        assert_eq!(identity.platform, "cloudfoundry");
        assert_eq!(identity.user_id.user_id, fixtures::ORIGINATING_USER_ID);
    }

    #[test]
    fn test_display_contains_platform_and_user() {
        let identity = parse_originating_identity(fixtures::ORIGINATING_IDENTITY).unwrap();
        let rendered = identity.to_string();
        assert!(rendered.contains("cloudfoundry"));
        assert!(rendered.contains(fixtures::ORIGINATING_USER_ID));
    }

    #[test]
    fn test_malformed_base64() {
        let err = parse_originating_identity("cloudfoundry !!!not-base64!!!").unwrap_err();
        assert!(matches!(err, IdentityParseError::Base64(_)));
    }

    #[test]
    fn test_missing_payload() {
        let err = parse_originating_identity("cloudfoundry").unwrap_err();
        assert!(matches!(err, IdentityParseError::MissingPayload(_)));
    }

    #[test]
    fn test_empty_value() {
        assert!(matches!(
            parse_originating_identity("   "),
            Err(IdentityParseError::Empty)
        ));
    }

    #[test]
    fn test_payload_not_json() {
        // base64 of "hello"
        let err = parse_originating_identity("kubernetes aGVsbG8=").unwrap_err();
        assert!(matches!(err, IdentityParseError::Json(_)));
    }

    #[test]
    fn test_extra_payload_fields_ignored() {
        let payload = STANDARD.encode(r#"{"user_id":"u1","email":"a@b.c"}"#);
        let identity = parse_originating_identity(&format!("cloudfoundry {payload}")).unwrap();
        assert_eq!(identity.user_id.user_id, "u1");
    }
}

//! OSB protocol constants and API version negotiation.
//!
//! Header constants are lowercase so they can be used directly as
//! `http::HeaderMap` keys; the `*_NAME` variants carry the canonical
//! spelling used in messages.

use crate::error::BrokerError;

/// The API version this broker implements.
pub const SUPPORTED_API_VERSION: &str = "2.14";

/// Mandatory request header carrying the platform's OSB version.
pub const API_VERSION_HEADER: &str = "x-broker-api-version";

/// Canonical spelling of [`API_VERSION_HEADER`].
pub const API_VERSION_HEADER_NAME: &str = "X-Broker-API-Version";

/// Optional request header identifying the end user behind a request.
pub const ORIGINATING_IDENTITY_HEADER: &str = "x-broker-api-originating-identity";

/// Canonical spelling of [`ORIGINATING_IDENTITY_HEADER`].
pub const ORIGINATING_IDENTITY_HEADER_NAME: &str = "X-Broker-API-Originating-Identity";

/// Optional request header carrying the platform's correlation id.
pub const REQUEST_IDENTITY_HEADER: &str = "x-broker-api-request-identity";

/// Canonical spelling of [`REQUEST_IDENTITY_HEADER`].
pub const REQUEST_IDENTITY_HEADER_NAME: &str = "X-Broker-API-Request-Identity";

/// JSON media type.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Plain text media type.
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// Returns the major component of a version string (text before the first `.`).
///
/// ```
/// use lookup_broker_core::protocol::major_version;
///
/// assert_eq!(major_version("2.14"), "2");
/// assert_eq!(major_version("2"), "2");
/// assert_eq!(major_version(""), "");
/// ```
#[must_use]
pub fn major_version(version: &str) -> &str {
    version.split_once('.').map_or(version, |(major, _)| major)
}

/// Checks a requested API version against the supported one.
///
/// Only the major components are compared; minor and patch levels are
/// forward compatible.
///
/// ```
/// use lookup_broker_core::protocol::check_api_version;
///
/// assert!(check_api_version(Some("2.15"), "2.14").is_ok());
/// assert!(check_api_version(Some("1.0"), "2.14").is_err());
/// assert!(check_api_version(None, "2.14").is_err());
/// ```
pub fn check_api_version(requested: Option<&str>, supported: &str) -> Result<(), BrokerError> {
    let requested = requested.unwrap_or_default();
    let requested_major = major_version(requested);

    if requested_major.is_empty() {
        return Err(BrokerError::MissingApiVersion);
    }

    if requested_major != major_version(supported) {
        return Err(BrokerError::ApiVersionMismatch {
            requested: requested.to_string(),
            supported: supported.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_missing_header() {
        assert_eq!(
            check_api_version(None, SUPPORTED_API_VERSION),
            Err(BrokerError::MissingApiVersion)
        );
        assert_eq!(
            check_api_version(Some(""), SUPPORTED_API_VERSION),
            Err(BrokerError::MissingApiVersion)
        );
    }

    #[test]
    fn test_leading_dot_counts_as_missing() {
        assert_eq!(
            check_api_version(Some(".14"), SUPPORTED_API_VERSION),
            Err(BrokerError::MissingApiVersion)
        );
    }

    #[test]
    fn test_non_numeric_version_mismatches() {
        let err = check_api_version(Some("abc"), SUPPORTED_API_VERSION).unwrap_err();
        assert_eq!(
            err,
            BrokerError::ApiVersionMismatch {
                requested: "abc".into(),
                supported: "2.14".into()
            }
        );
    }

    #[test]
    fn test_matching_majors() {
        assert!(check_api_version(Some("2"), SUPPORTED_API_VERSION).is_ok());
        assert!(check_api_version(Some("2.0"), SUPPORTED_API_VERSION).is_ok());
        assert!(check_api_version(Some("2.14"), SUPPORTED_API_VERSION).is_ok());
        assert!(check_api_version(Some("2.99.1"), SUPPORTED_API_VERSION).is_ok());
    }

    proptest! {
        #[test]
        fn prop_minor_is_ignored(minor in "[0-9]{1,4}(\\.[0-9]{1,3})?") {
            let requested = format!("2.{minor}");
            prop_assert!(check_api_version(Some(&requested), SUPPORTED_API_VERSION).is_ok());
        }

        #[test]
        fn prop_other_majors_rejected(major in 0u32..1000, minor in 0u32..100) {
            prop_assume!(major != 2);
            let requested = format!("{major}.{minor}");
            let result = check_api_version(Some(&requested), SUPPORTED_API_VERSION);
            prop_assert!(
                matches!(result, Err(BrokerError::ApiVersionMismatch { .. })),
                "expected mismatch for {}",
                requested
            );
        }
    }
}

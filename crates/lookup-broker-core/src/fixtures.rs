//! Shared test data.
//!
//! Used by this workspace's unit and end-to-end tests and by the demo
//! configuration. The landscape document mirrors a production `LANDSCAPES`
//! value.

use crate::landscape::{JsonLandscapeSource, LandscapeDirectory};

/// Three-landscape directory in its JSON form.
pub const LANDSCAPES_JSON: &str = r#"{
  "cf-eu10": {
    "cloudcontroller": "https://api.cf.eu10.hana.ondemand.com",
    "uaa": "https://uaa.cf.eu10.hana.ondemand.com",
    "labels": ["master", "aws"]
  },
  "cf-eu10-001": {
    "cloudcontroller": "https://api.cf.eu10-001.hana.ondemand.com",
    "uaa": "https://uaa.cf.eu10-001.hana.ondemand.com",
    "labels": ["scaleout", "aws"]
  },
  "cf-eu10-002": {
    "cloudcontroller": "https://api.cf.eu10-002.hana.ondemand.com",
    "uaa": "https://uaa.cf.eu10-002.hana.ondemand.com",
    "labels": ["scaleout", "aws"]
  }
}"#;

/// A Cloud Foundry originating identity header value.
pub const ORIGINATING_IDENTITY: &str =
    "cloudfoundry eyANCiAgInVzZXJfaWQiOiAiNjgzZWE3NDgtMzA5Mi00ZmY0LWI2NTYtMzljYWNjNGQ1MzYwIg0KfQ==";

/// User id encoded in [`ORIGINATING_IDENTITY`].
pub const ORIGINATING_USER_ID: &str = "683ea748-3092-4ff4-b656-39cacc4d5360";

/// A platform request identity header value.
pub const REQUEST_IDENTITY: &str = "e26cee84-6b38-4456-b34e-d1a9f002c956";

/// The parsed [`LANDSCAPES_JSON`] directory.
#[must_use]
pub fn landscapes() -> LandscapeDirectory {
    LandscapeDirectory::from_json(LANDSCAPES_JSON).unwrap_or_default()
}

/// A source serving [`LANDSCAPES_JSON`].
#[must_use]
pub fn landscape_source() -> JsonLandscapeSource {
    JsonLandscapeSource::new(LANDSCAPES_JSON)
}

//! # Lookup Broker Core
//!
//! Core types for the lookup service broker, an Open Service Broker (OSB)
//! API implementation that exposes a directory of Cloud Foundry landscapes
//! to bound applications.
//!
//! This crate has no HTTP server dependency. It provides:
//!
//! - [`protocol`] - OSB header names, the supported API version and the
//!   version negotiation rule
//! - [`catalog`] - the static service/plan catalog
//! - [`instance`] and [`binding`] - request and response payloads
//! - [`identity`] - the originating-identity header parser
//! - [`landscape`] - the landscape directory and its sources
//! - [`error`] - [`BrokerError`] and the OSB error envelope
//!
//! ## Example
//!
//! ```
//! use lookup_broker_core::{catalog, LandscapeSource, JsonLandscapeSource};
//!
//! let catalog = catalog::catalog();
//! assert_eq!(catalog.services[0].name, "lookup");
//!
//! let source = JsonLandscapeSource::new(r#"{"cf-eu10": {"cloudcontroller": "https://api", "uaa": "https://uaa", "labels": []}}"#);
//! assert_eq!(source.get_all().len(), 1);
//! ```

#![doc(html_root_url = "https://docs.rs/lookup-broker-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod binding;
pub mod catalog;
pub mod error;
pub mod fixtures;
pub mod identity;
pub mod instance;
pub mod landscape;
pub mod protocol;
mod request_id;

pub use catalog::{Catalog, MaintenanceInfo, Plan, Service};
pub use error::{BrokerError, BrokerResult, OsbError};
pub use identity::{parse_originating_identity, IdentityParseError, OriginatingIdentity, UserId};
pub use landscape::{
    EnvLandscapeSource, JsonLandscapeSource, LandscapeDescriptor, LandscapeDirectory,
    LandscapeSource,
};
pub use request_id::RequestId;

//! # Lookup Broker
//!
//! An Open Service Broker that hands a directory of Cloud Foundry
//! landscapes to bound applications.
//!
//! The crate wires the workspace together: the resource [`handlers`], the
//! route table and the `/v2` protocol pipeline in [`routes`]. The
//! `lookup-broker` binary loads configuration, initialises telemetry and
//! serves the dispatcher built by [`build_dispatcher`].
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use lookup_broker::build_dispatcher;
//! use lookup_broker_core::JsonLandscapeSource;
//!
//! let source = Arc::new(JsonLandscapeSource::new("{}"));
//! let dispatcher = build_dispatcher("2.14", source);
//! assert!(dispatcher.router().has_operation("v2.catalog"));
//! ```

#![doc(html_root_url = "https://docs.rs/lookup-broker/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod handlers;
pub mod routes;

pub use routes::build_dispatcher;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build commit, from `LOOKUP_BROKER_COMMIT` at compile time.
pub const COMMIT: &str = match option_env!("LOOKUP_BROKER_COMMIT") {
    Some(commit) => commit,
    None => "n/a",
};

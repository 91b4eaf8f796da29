//! # Lookup Broker Test
//!
//! In-memory testing utilities for the lookup broker.
//!
//! [`TestClient`] drives a [`Dispatcher`](lookup_broker_server::Dispatcher)
//! directly, so route matching, middleware stages and handlers run exactly
//! as they would behind the HTTP server, without binding a port.
//! [`TestResponse`] carries chainable assertions, including
//! [`assert_osb_error`](TestResponse::assert_osb_error) for the OSB error
//! envelope.

#![doc(html_root_url = "https://docs.rs/lookup-broker-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::TestRequestBuilder;
pub use response::TestResponse;

//! # Lookup Broker Server
//!
//! Routing, dispatch and the HTTP server of the lookup broker.
//!
//! - [`Router`] maps a method and path template to an operation id and
//!   records the content type a route consumes.
//! - [`HandlerRegistry`] maps operation ids to async handlers returning
//!   `Result<Response, BrokerError>`.
//! - [`Dispatcher`] runs the pipeline of the request's path scope around
//!   the handler and renders every failure as an OSB error envelope.
//! - [`Server`] serves a dispatcher over HTTP/1 with graceful shutdown.
//!
//! ## Example
//!
//! ```rust
//! use http::{Method, StatusCode};
//! use lookup_broker_middleware::{Pipeline, Response, ResponseExt};
//! use lookup_broker_middleware::stages::RequestLogMiddleware;
//! use lookup_broker_server::{Dispatcher, HandlerRegistry, Router};
//!
//! let mut router = Router::new();
//! router.add_route(Method::GET, "/", "root");
//!
//! let mut handlers = HandlerRegistry::new();
//! handlers.register("root", |_route, _request| async {
//!     Ok(Response::text(StatusCode::OK, "lookup broker"))
//! });
//!
//! let dispatcher = Dispatcher::builder()
//!     .router(router)
//!     .handlers(handlers)
//!     .default_pipeline(Pipeline::builder().stage(RequestLogMiddleware::new()).build())
//!     .build();
//!
//! assert_eq!(dispatcher.pipeline_for("/").stage_names(), vec!["request_log"]);
//! ```

#![doc(html_root_url = "https://docs.rs/lookup-broker-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod shutdown;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use dispatch::{Dispatcher, DispatcherBuilder};
pub use error::ServerError;
pub use handler::{ErasedHandler, HandlerRegistry};
pub use router::{RouteMatch, Router};
pub use server::Server;
pub use shutdown::{ConnectionTracker, ShutdownSignal};

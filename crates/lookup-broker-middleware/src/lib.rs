//! # Lookup Broker Middleware
//!
//! The request pipeline of the lookup broker and its OSB protocol stages.
//!
//! ```text
//! Request → RequestLog → ApiVersion → RequestIdentity → OriginatingIdentity → Etag → Handler
//!                                                                                      ↓
//! Response ←─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stages implement [`Middleware`] and are composed with [`Pipeline`]. Any
//! stage may short-circuit; the API-version gate does so with 412 and the
//! ETag stage with 304.
//!
//! All error responses are built by [`ResponseExt`], which renders the OSB
//! error envelope.
//!
//! ## Example
//!
//! ```
//! use lookup_broker_middleware::stages::{ApiVersionMiddleware, RequestLogMiddleware};
//! use lookup_broker_middleware::Pipeline;
//!
//! let pipeline = Pipeline::builder()
//!     .stage(RequestLogMiddleware::new())
//!     .stage(ApiVersionMiddleware::default())
//!     .build();
//!
//! assert_eq!(pipeline.stage_names(), vec!["request_log", "api_version"]);
//! ```

#![doc(html_root_url = "https://docs.rs/lookup-broker-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod middleware;
pub mod pipeline;
pub mod stages;
pub mod types;

pub use context::MiddlewareContext;
pub use middleware::{BoxFuture, HandlerFn, Middleware, Next};
pub use pipeline::{BoxedMiddleware, Pipeline, PipelineBuilder};
pub use types::{Request, Response, ResponseExt};

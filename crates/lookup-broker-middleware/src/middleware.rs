//! The stage trait and the continuation it calls.
//!
//! A [`Middleware`] sees the request on its way in and the response on its
//! way out. It either calls [`Next::run`] exactly once or short-circuits
//! with its own response (the API-version gate answers 412 this way).
//!
//! # Example
//!
//! ```ignore
//! use lookup_broker_middleware::{BoxFuture, Middleware, MiddlewareContext, Next, Request, Response};
//!
//! struct Banner;
//!
//! impl Middleware for Banner {
//!     fn name(&self) -> &'static str {
//!         "banner"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut MiddlewareContext,
//!         request: Request,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, Response> {
//!         Box::pin(async move {
//!             tracing::info!(request_id = %ctx.request_id(), "before");
//!             next.run(ctx, request).await
//!         })
//!     }
//! }
//! ```

use crate::context::MiddlewareContext;
use crate::types::{Request, Response};
use std::future::Future;
use std::pin::Pin;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The terminal step of a chain: the route handler.
pub type HandlerFn<'a> =
    Box<dyn FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a>;

/// A request interceptor.
///
/// Implementations must be safe for concurrent use; they hold no per-request
/// state outside the [`MiddlewareContext`].
pub trait Middleware: Send + Sync + 'static {
    /// Stage name used in logs and by [`Pipeline::stage_names`](crate::Pipeline::stage_names).
    fn name(&self) -> &'static str;

    /// Processes the request, usually by delegating to `next`.
    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response>;
}

/// The rest of the chain after the current stage.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    Handler(HandlerFn<'a>),
}

impl<'a> Next<'a> {
    /// Wraps `next` with `middleware`.
    pub(crate) fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal step that invokes the handler.
    pub fn handler<F>(f: F) -> Self
    where
        F: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a,
    {
        Self {
            inner: NextInner::Handler(Box::new(f)),
        }
    }

    /// Invokes the next stage or the handler. Consumes `self`.
    pub async fn run(self, ctx: &mut MiddlewareContext, request: Request) -> Response {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(ctx, request, *next).await,
            NextInner::Handler(handler) => handler(ctx, request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseExt;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::Full;
    use std::sync::{Arc, Mutex};

    struct Marker {
        name: &'static str,
        visited: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Middleware for Marker {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            ctx: &'a mut MiddlewareContext,
            request: Request,
            next: Next<'a>,
        ) -> BoxFuture<'a, Response> {
            Box::pin(async move {
                self.visited.lock().unwrap().push(self.name);
                next.run(ctx, request).await
            })
        }
    }

    fn request() -> Request {
        Request::new(Full::new(Bytes::new()))
    }

    fn ok_handler() -> impl FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> {
        |_ctx, _req| Box::pin(async { Response::text(StatusCode::OK, "OK") })
    }

    #[tokio::test]
    async fn test_handler_only() {
        let mut ctx = MiddlewareContext::new();
        let response = Next::handler(ok_handler()).run(&mut ctx, request()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_outer_stage_runs_first() {
        let visited = Arc::new(Mutex::new(Vec::new()));
        let outer = Marker {
            name: "outer",
            visited: Arc::clone(&visited),
        };
        let inner = Marker {
            name: "inner",
            visited: Arc::clone(&visited),
        };

        let mut ctx = MiddlewareContext::new();
        let next = Next::new(&outer, Next::new(&inner, Next::handler(ok_handler())));
        let response = next.run(&mut ctx, request()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*visited.lock().unwrap(), ["outer", "inner"]);
    }
}

//! Ordered composition of middleware stages.
//!
//! A [`Pipeline`] is built once at startup and shared by every request it
//! serves. Stages run in insertion order on the way in and in reverse order
//! on the way out; any stage may answer without calling the rest.

use std::fmt;
use std::sync::Arc;

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};

/// A shared, type-erased stage.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An immutable list of stages in front of a terminal handler.
///
/// ```
/// use lookup_broker_middleware::Pipeline;
/// use lookup_broker_middleware::stages::{ApiVersionMiddleware, RequestLogMiddleware};
///
/// let pipeline = Pipeline::builder()
///     .stage(RequestLogMiddleware::new())
///     .stage(ApiVersionMiddleware::default())
///     .build();
///
/// assert_eq!(pipeline.stage_names(), ["request_log", "api_version"]);
/// ```
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<BoxedMiddleware>,
}

impl Pipeline {
    /// Starts an empty pipeline.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Runs `request` through the stages, then `handler`.
    pub async fn process<H>(&self, mut ctx: MiddlewareContext, request: Request, handler: H) -> Response
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'static,
    {
        let chain = self
            .stages
            .iter()
            .rev()
            .fold(Next::handler(handler), |next, stage| Next::new(stage.as_ref(), next));

        chain.run(&mut ctx, request).await
    }

    /// Stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.stage_names()).finish()
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl PipelineBuilder {
    /// Appends a stage after those already added.
    #[must_use]
    pub fn stage<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Freezes the stage list.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
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
    use std::sync::Mutex;

    type Trace = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        trace: Trace,
    }

    impl Middleware for Recorder {
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
                self.trace.lock().unwrap().push(format!("{} in", self.name));
                let response = next.run(ctx, request).await;
                self.trace.lock().unwrap().push(format!("{} out", self.name));
                response
            })
        }
    }

    struct Gate;

    impl Middleware for Gate {
        fn name(&self) -> &'static str {
            "gate"
        }

        fn process<'a>(
            &'a self,
            _ctx: &'a mut MiddlewareContext,
            _request: Request,
            _next: Next<'a>,
        ) -> BoxFuture<'a, Response> {
            Box::pin(async { Response::osb_error(StatusCode::PRECONDITION_FAILED, "closed") })
        }
    }

    fn recorder(name: &'static str, trace: &Trace) -> Recorder {
        Recorder {
            name,
            trace: Arc::clone(trace),
        }
    }

    fn catalog_request() -> Request {
        let mut request = Request::new(Full::new(Bytes::new()));
        *request.uri_mut() = "/v2/catalog".parse().unwrap();
        request
    }

    #[tokio::test]
    async fn test_stages_wrap_handler_in_order() {
        let trace = Trace::default();
        let pipeline = Pipeline::builder()
            .stage(recorder("log", &trace))
            .stage(recorder("version", &trace))
            .build();

        let handler_trace = Arc::clone(&trace);
        let response = pipeline
            .process(MiddlewareContext::new(), catalog_request(), move |_ctx, _req| {
                handler_trace.lock().unwrap().push("handler".to_string());
                Box::pin(async { Response::text(StatusCode::OK, "catalog") })
            })
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            *trace.lock().unwrap(),
            ["log in", "version in", "handler", "version out", "log out"]
        );
        assert_eq!(format!("{pipeline:?}"), r#"["log", "version"]"#);
    }

    #[tokio::test]
    async fn test_gate_skips_later_stages_and_handler() {
        let trace = Trace::default();
        let pipeline = Pipeline::builder()
            .stage(recorder("log", &trace))
            .stage(Gate)
            .stage(recorder("never", &trace))
            .build();

        let response = pipeline
            .process(MiddlewareContext::new(), catalog_request(), |_ctx, _req| {
                Box::pin(async { Response::empty(StatusCode::OK) })
            })
            .await;

        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
        assert_eq!(*trace.lock().unwrap(), ["log in", "log out"]);
    }

    #[tokio::test]
    async fn test_empty_pipeline_runs_handler() {
        let pipeline = Pipeline::default();
        assert_eq!(pipeline.stage_count(), 0);

        let response = pipeline
            .process(MiddlewareContext::new(), catalog_request(), |_ctx, _req| {
                Box::pin(async { Response::empty(StatusCode::NO_CONTENT) })
            })
            .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}

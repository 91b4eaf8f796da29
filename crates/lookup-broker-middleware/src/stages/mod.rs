//! OSB protocol stages.
//!
//! Every route runs [`request_log`]. Routes under `/v2` additionally run,
//! in order:
//!
//! 1. [`api_version`] - reject incompatible `X-Broker-API-Version` (412)
//! 2. [`request_identity`] - log `X-Broker-API-Request-Identity`
//! 3. [`originating_identity`] - log `X-Broker-API-Originating-Identity`
//! 4. [`etag`] - stamp the landscape digest as a weak `ETag`

pub mod api_version;
pub mod etag;
pub mod originating_identity;
pub mod request_identity;
pub mod request_log;

pub use api_version::ApiVersionMiddleware;
pub use etag::EtagMiddleware;
pub use originating_identity::OriginatingIdentityMiddleware;
pub use request_identity::RequestIdentityMiddleware;
pub use request_log::RequestLogMiddleware;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::context::MiddlewareContext;
    use crate::middleware::BoxFuture;
    use crate::types::{Request, Response, ResponseExt};
    use bytes::Bytes;
    use http::{Request as HttpRequest, StatusCode};
    use http_body_util::Full;

    pub fn request_with(headers: &[(&str, &str)]) -> Request {
        let mut builder = HttpRequest::builder().uri("/v2/catalog");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    pub fn create_handler(
    ) -> impl FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> {
        |_ctx, _req| Box::pin(async { Response::text(StatusCode::OK, "OK") })
    }
}

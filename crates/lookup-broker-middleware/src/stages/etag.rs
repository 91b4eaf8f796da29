//! Landscape ETag annotator.
//!
//! Computes a digest of the current landscape directory and sets it as a
//! weak validator, `ETag: W/"<sha1-hex>"`, on every response. The same
//! directory content always yields the same tag, so a platform can cache
//! the catalog and notice landscape changes.
//!
//! A `GET` whose `If-None-Match` matches the current tag (or is `*`) still
//! runs the handler. Only a successful response becomes `304 Not Modified`;
//! errors such as 501 pass through unchanged.

use std::sync::Arc;

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response, ResponseExt};
use http::header::{HeaderValue, ETAG, IF_NONE_MATCH};
use http::{Method, StatusCode};
use lookup_broker_core::LandscapeSource;

/// Stamps the landscape digest on responses.
#[derive(Clone)]
pub struct EtagMiddleware {
    source: Arc<dyn LandscapeSource>,
}

impl EtagMiddleware {
    /// Creates the stage over `source`.
    pub fn new(source: Arc<dyn LandscapeSource>) -> Self {
        Self { source }
    }

    /// The weak ETag for the directory as it is now.
    #[must_use]
    pub fn current_etag(&self) -> String {
        weak_etag(&self.source.get_all().content_digest())
    }
}

impl std::fmt::Debug for EtagMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtagMiddleware").finish_non_exhaustive()
    }
}

/// Renders `digest` as a weak entity tag.
#[must_use]
pub fn weak_etag(digest: &str) -> String {
    format!("W/\"{digest}\"")
}

fn opaque_tag(tag: &str) -> &str {
    tag.trim().strip_prefix("W/").unwrap_or_else(|| tag.trim())
}

/// Weak comparison of an `If-None-Match` value against `etag`.
#[must_use]
pub fn if_none_match(header: &str, etag: &str) -> bool {
    header
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || opaque_tag(candidate) == opaque_tag(etag))
}

impl Middleware for EtagMiddleware {
    fn name(&self) -> &'static str {
        "etag"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let etag = self.current_etag();
            let header_value = HeaderValue::from_str(&etag).ok();

            let not_modified = request.method() == Method::GET
                && request
                    .headers()
                    .get(IF_NONE_MATCH)
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|v| if_none_match(v, &etag));

            let mut response = next.run(ctx, request).await;
            if not_modified && response.status().is_success() {
                tracing::debug!(request_id = %ctx.request_id(), etag = %etag, "not modified");
                response = Response::empty(StatusCode::NOT_MODIFIED);
            }

            if let Some(value) = header_value {
                response.headers_mut().insert(ETAG, value);
            }

            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::{create_handler, request_with};
    use lookup_broker_core::{fixtures, BrokerError, JsonLandscapeSource, LandscapeDirectory};

    fn middleware(json: &str) -> EtagMiddleware {
        EtagMiddleware::new(Arc::new(JsonLandscapeSource::new(json)))
    }

    async fn etag_of(mw: &EtagMiddleware, request: Request) -> (StatusCode, String) {
        let mut ctx = MiddlewareContext::new();
        let response = mw
            .process(&mut ctx, request, Next::handler(create_handler()))
            .await;
        let etag = response
            .headers()
            .get(ETAG)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        (response.status(), etag)
    }

    #[tokio::test]
    async fn test_sets_weak_etag() {
        let mw = middleware(fixtures::LANDSCAPES_JSON);
        let (status, etag) = etag_of(&mw, request_with(&[])).await;

        assert_eq!(status, StatusCode::OK);
        let digest = fixtures::landscapes().content_digest();
        assert_eq!(etag, format!("W/\"{digest}\""));
    }

    #[tokio::test]
    async fn test_etag_is_deterministic() {
        let mw = middleware(fixtures::LANDSCAPES_JSON);
        let (_, first) = etag_of(&mw, request_with(&[])).await;
        let (_, second) = etag_of(&mw, request_with(&[])).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_etag_changes_with_directory() {
        let (_, full) = etag_of(&middleware(fixtures::LANDSCAPES_JSON), request_with(&[])).await;
        let (_, empty) = etag_of(&middleware("{}"), request_with(&[])).await;
        assert_ne!(full, empty);
    }

    #[tokio::test]
    async fn test_malformed_directory_still_tagged() {
        let (status, etag) = etag_of(&middleware("not json"), request_with(&[])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            etag,
            weak_etag(&LandscapeDirectory::default().content_digest())
        );
    }

    #[tokio::test]
    async fn test_if_none_match_returns_304() {
        let mw = middleware(fixtures::LANDSCAPES_JSON);
        let current = mw.current_etag();

        let (status, etag) = etag_of(&mw, request_with(&[("if-none-match", current.as_str())])).await;
        assert_eq!(status, StatusCode::NOT_MODIFIED);
        assert_eq!(etag, current);

        let (status, _) = etag_of(&mw, request_with(&[("if-none-match", "W/\"stale\"")])).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_if_none_match_keeps_error_status() {
        let mw = middleware(fixtures::LANDSCAPES_JSON);
        let mut ctx = MiddlewareContext::new();
        let handler = Next::handler(|_ctx, _req| {
            Box::pin(async {
                Response::broker_error(&BrokerError::NotImplemented("last_operation".into()))
            })
        });

        let response = mw
            .process(&mut ctx, request_with(&[("if-none-match", "*")]), handler)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(
            response.headers().get(ETAG).unwrap().to_str().unwrap(),
            mw.current_etag()
        );
    }

    #[tokio::test]
    async fn test_if_none_match_ignored_for_put() {
        let mw = middleware(fixtures::LANDSCAPES_JSON);
        let mut request = request_with(&[("if-none-match", "*")]);
        *request.method_mut() = Method::PUT;

        let (status, _) = etag_of(&mw, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn test_if_none_match_comparison() {
        assert!(if_none_match("*", "W/\"abc\""));
        assert!(if_none_match("\"abc\"", "W/\"abc\""));
        assert!(if_none_match("W/\"x\", W/\"abc\"", "W/\"abc\""));
        assert!(!if_none_match("W/\"abcd\"", "W/\"abc\""));
    }

    proptest::proptest! {
        #[test]
        fn prop_digest_tag_matches_itself(digest in "[0-9a-f]{40}") {
            let tag = weak_etag(&digest);
            proptest::prop_assert!(if_none_match(&tag, &tag));
        }
    }
}

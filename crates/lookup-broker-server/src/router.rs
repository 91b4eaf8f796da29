//! Request routing and path matching.
//!
//! The router maps a method and a path to an operation id. Path templates
//! use `{name}` segments for parameters, e.g.
//! `/v2/service_instances/{instance_id}`. Matching is exact: a trailing
//! slash or an empty segment does not match, and a parameter never matches
//! an empty segment. A route may also declare the
//! content type its body must carry; the dispatcher enforces it.
//!
//! # Example
//!
//! ```rust
//! use lookup_broker_server::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.add_route(Method::GET, "/v2/service_instances/{instance_id}", "getInstance");
//!
//! let route_match = router
//!     .match_route(&Method::GET, "/v2/service_instances/abc")
//!     .unwrap();
//! assert_eq!(route_match.operation_id(), "getInstance");
//! assert_eq!(route_match.param("instance_id"), Some("abc"));
//! ```

use std::collections::HashMap;

use http::Method;

/// A matched route with extracted path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    operation_id: String,
    pattern: String,
    content_type: Option<&'static str>,
    params: HashMap<String, String>,
}

impl RouteMatch {
    /// Operation id of the matched route.
    #[must_use]
    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    /// Path template of the matched route, used as the metrics label.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Content type the request body must carry, if the route requires one.
    #[must_use]
    pub fn content_type(&self) -> Option<&'static str> {
        self.content_type
    }

    /// All extracted path parameters.
    #[must_use]
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// A single path parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    segments: Vec<PathSegment>,
    operation_id: String,
    pattern: String,
    content_type: Option<&'static str>,
}

impl Route {
    fn new(
        method: Method,
        pattern: &str,
        operation_id: String,
        content_type: Option<&'static str>,
    ) -> Self {
        Self {
            method,
            segments: Self::parse_segments(pattern),
            operation_id,
            pattern: pattern.to_string(),
            content_type,
        }
    }

    fn parse_segments(pattern: &str) -> Vec<PathSegment> {
        pattern
            .split('/')
            .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => PathSegment::Param(name.to_string()),
                None => PathSegment::Literal(s.to_string()),
            })
            .collect()
    }

    fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let path_segments: Vec<&str> = path.split('/').collect();

        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();

        for (segment, actual) in self.segments.iter().zip(path_segments) {
            match segment {
                PathSegment::Literal(expected) if expected != actual => return None,
                PathSegment::Literal(_) => {}
                PathSegment::Param(_) if actual.is_empty() => return None,
                PathSegment::Param(name) => {
                    params.insert(name.clone(), actual.to_string());
                }
            }
        }

        Some(params)
    }

    fn to_match(&self, params: HashMap<String, String>) -> RouteMatch {
        RouteMatch {
            operation_id: self.operation_id.clone(),
            pattern: self.pattern.clone(),
            content_type: self.content_type,
            params,
        }
    }
}

/// HTTP request router.
///
/// Routes are checked in registration order; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route.
    pub fn add_route(&mut self, method: Method, pattern: &str, operation_id: impl Into<String>) {
        self.routes
            .push(Route::new(method, pattern, operation_id.into(), None));
    }

    /// Registers a route whose request body must be sent as `content_type`.
    ///
    /// ```rust
    /// use lookup_broker_server::Router;
    /// use http::Method;
    ///
    /// let mut router = Router::new();
    /// router.add_route_consuming(
    ///     Method::PUT,
    ///     "/v2/service_instances/{instance_id}",
    ///     "provisionInstance",
    ///     "application/json",
    /// );
    ///
    /// let m = router.match_route(&Method::PUT, "/v2/service_instances/1").unwrap();
    /// assert_eq!(m.content_type(), Some("application/json"));
    /// ```
    pub fn add_route_consuming(
        &mut self,
        method: Method,
        pattern: &str,
        operation_id: impl Into<String>,
        content_type: &'static str,
    ) {
        self.routes.push(Route::new(
            method,
            pattern,
            operation_id.into(),
            Some(content_type),
        ));
    }

    /// Number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Matches a request method and path.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| route.match_path(path).map(|params| route.to_match(params)))
    }

    /// Methods routed for `path`, in registration order. A non-empty result
    /// for a method [`match_route`](Self::match_route) rejects means 405
    /// rather than 404.
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = Vec::new();
        for route in &self.routes {
            if !methods.contains(&route.method) && route.match_path(path).is_some() {
                methods.push(route.method.clone());
            }
        }
        methods
    }

    /// Whether any route maps to `operation_id`.
    #[must_use]
    pub fn has_operation(&self, operation_id: &str) -> bool {
        self.routes.iter().any(|r| r.operation_id == operation_id)
    }

    /// All registered operation ids, in registration order.
    pub fn operation_ids(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.operation_id.as_str())
    }
}

use super::{Middleware, Next};
use crate::http::{ApiResponse, HttpResponse, Request, Response};
use async_trait::async_trait;
use http::Method;
use std::collections::HashSet;

/// Which requests need a bearer token
#[derive(Debug, Clone)]
struct AccessRule {
    /// Empty means every method
    methods: Vec<Method>,
    prefix: String,
}

impl AccessRule {
    fn matches(&self, method: &Method, path: &str) -> bool {
        let method_matches = self.methods.is_empty() || self.methods.contains(method);
        method_matches && path_has_prefix(path, &self.prefix)
    }
}

/// Segment-aware prefix check: `/api/products` covers `/api/products/3`
/// but not `/api/productsearch`
fn path_has_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Rejects requests to protected routes that lack a valid bearer token
///
/// Runs before static files and routing, so a rejected request never reaches
/// either.
///
/// ```rust,ignore
/// AuthorizationMiddleware::new(config.auth.tokens.clone())
///     .require(&[Method::POST, Method::PUT, Method::DELETE], "/api/products")
/// ```
#[derive(Debug, Clone, Default)]
pub struct AuthorizationMiddleware {
    rules: Vec<AccessRule>,
    tokens: HashSet<String>,
}

impl AuthorizationMiddleware {
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            rules: Vec::new(),
            tokens: tokens
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Protect `prefix` for the given methods (all methods when empty)
    pub fn require(mut self, methods: &[Method], prefix: &str) -> Self {
        self.rules.push(AccessRule {
            methods: methods.to_vec(),
            prefix: prefix.to_string(),
        });
        self
    }

    fn is_protected(&self, request: &Request) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.matches(request.method(), request.path()))
    }

    fn is_authenticated(&self, request: &Request) -> bool {
        request
            .bearer_token()
            .map(|token| self.tokens.contains(token))
            .unwrap_or(false)
    }
}

#[async_trait]
impl Middleware for AuthorizationMiddleware {
    async fn handle(&self, request: Request, next: Next) -> Response {
        if self.is_protected(&request) && !self.is_authenticated(&request) {
            tracing::info!(
                method = %request.method(),
                path = request.path(),
                "rejected unauthenticated request"
            );
            return Err(HttpResponse::json_body(&ApiResponse::new(401))
                .status(401)
                .header("WWW-Authenticate", "Bearer"));
        }

        next(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Pipeline;
    use crate::routing::Router;
    use crate::testing::TestRequest;
    use pretty_assertions::assert_eq;

    fn pipeline() -> Pipeline {
        let router: Router = Router::new()
            .get("/api/products", |_req| async { crate::http::text("list") })
            .post("/api/products", |_req| async { crate::http::text("created") })
            .post("/api/productsearch", |_req| async { crate::http::text("search") })
            .into();
        Pipeline::new(router).stage(
            AuthorizationMiddleware::new(vec!["secret".to_string()])
                .require(&[Method::POST, Method::PUT, Method::DELETE], "/api/products"),
        )
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let response = pipeline()
            .handle(TestRequest::post("/api/products").build())
            .await;

        assert_eq!(response.status_code(), 401);
        assert_eq!(response.header_value("www-authenticate"), Some("Bearer"));
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["message"], "Authorized, you are not");
    }

    #[tokio::test]
    async fn test_valid_token_and_open_routes() {
        let pipeline = pipeline();

        let authorized = pipeline
            .handle(
                TestRequest::post("/api/products")
                    .header("Authorization", "Bearer secret")
                    .build(),
            )
            .await;
        assert_eq!(authorized.status_code(), 200);

        let wrong = pipeline
            .handle(
                TestRequest::post("/api/products")
                    .header("Authorization", "Bearer guess")
                    .build(),
            )
            .await;
        assert_eq!(wrong.status_code(), 401);

        let read = pipeline.handle(TestRequest::get("/api/products").build()).await;
        assert_eq!(read.status_code(), 200);

        let sibling = pipeline
            .handle(TestRequest::post("/api/productsearch").build())
            .await;
        assert_eq!(sibling.status_code(), 200);
    }
}

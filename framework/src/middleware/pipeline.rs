//! The application's ordered stage list, terminating in route dispatch
//!
//! Built once by the composition root; stages run in the order they were
//! added and the router is always last.

use super::{into_boxed, BoxedMiddleware, Middleware, MiddlewareChain};
use crate::http::{HttpResponse, Request};
use crate::routing::{BoxedHandler, Router};
use std::sync::Arc;

/// Ordered request pipeline
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = Pipeline::new(routes::register(services))
///     .stage(ExceptionMiddleware::new(config.environment()))
///     .stage(HttpsRedirection::new(config.server.https_port))
///     .stage(StaticFiles::new(&config.server.static_root));
/// ```
pub struct Pipeline {
    stages: Vec<BoxedMiddleware>,
    endpoint: Arc<BoxedHandler>,
}

impl Pipeline {
    pub fn new(router: Router) -> Self {
        let router = Arc::new(router);
        let endpoint: BoxedHandler = Box::new(move |request| {
            let router = router.clone();
            Box::pin(async move { router.dispatch(request).await })
        });

        Self {
            stages: Vec::new(),
            endpoint: Arc::new(endpoint),
        }
    }

    /// Append a stage; it runs after every stage added before it
    pub fn stage<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.stages.push(into_boxed(middleware));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run a request through every stage and the router
    pub async fn handle(&self, request: Request) -> HttpResponse {
        let mut chain = MiddlewareChain::new();
        chain.extend(self.stages.iter().cloned());

        // Both Ok and Err carry a response
        chain
            .execute(request, self.endpoint.clone())
            .await
            .unwrap_or_else(|e| e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Response, ResponseExt};
    use crate::middleware::Next;
    use crate::testing::TestRequest;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct Tag(&'static str);

    #[async_trait]
    impl Middleware for Tag {
        async fn handle(&self, request: Request, next: Next) -> Response {
            next(request).await.header("X-Stage", self.0)
        }
    }

    #[tokio::test]
    async fn test_router_is_the_terminal_stage() {
        let router = Router::new().get("/ping", |_req| async { crate::http::text("pong") });
        let pipeline = Pipeline::new(router.into()).stage(Tag("outer"));

        let response = pipeline.handle(TestRequest::get("/ping").build()).await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.body().as_ref(), b"pong");
        assert_eq!(response.header_value("x-stage"), Some("outer"));
    }

    #[tokio::test]
    async fn test_unmatched_route_is_api_not_found() {
        let pipeline = Pipeline::new(Router::new());

        let response = pipeline.handle(TestRequest::get("/nothing").build()).await;
        assert_eq!(response.status_code(), 404);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["message"], "Resource was not found");
    }
}

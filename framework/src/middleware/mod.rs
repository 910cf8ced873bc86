//! Middleware: request stages that either answer or forward to `next`
//!
//! A stage receives the request and a `Next` continuation. Calling
//! `next(request).await` forwards to the rest of the chain; returning without
//! calling it short-circuits everything downstream.
//!
//! ```rust,ignore
//! use kit::{async_trait, Middleware, Next, Request, Response};
//!
//! pub struct RequireJson;
//!
//! #[async_trait]
//! impl Middleware for RequireJson {
//!     async fn handle(&self, request: Request, next: Next) -> Response {
//!         if request.content_type() != Some("application/json") {
//!             return Err(HttpResponse::text("JSON only").status(415));
//!         }
//!         next(request).await
//!     }
//! }
//! ```

mod authorization;
mod docs;
mod exception;
mod https;
mod pipeline;
mod static_files;

pub use authorization::AuthorizationMiddleware;
pub use docs::ApiDocs;
pub use exception::ExceptionMiddleware;
pub use https::HttpsRedirection;
pub use pipeline::Pipeline;
pub use static_files::StaticFiles;

use crate::http::{Request, Response};
use crate::routing::BoxedHandler;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type BoxedFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Continuation into the remainder of the chain
pub type Next = Arc<dyn Fn(Request) -> BoxedFuture + Send + Sync>;

/// A single pipeline stage
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: Request, next: Next) -> Response;
}

pub type BoxedMiddleware = Arc<dyn Middleware>;

pub fn into_boxed<M: Middleware + 'static>(middleware: M) -> BoxedMiddleware {
    Arc::new(middleware)
}

/// Ordered middleware list wrapped around an endpoint
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middleware: Vec<BoxedMiddleware>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, middleware: BoxedMiddleware) {
        self.middleware.push(middleware);
    }

    pub fn extend(&mut self, middleware: impl IntoIterator<Item = BoxedMiddleware>) {
        self.middleware.extend(middleware);
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Run the chain, first registered outermost, ending in `endpoint`
    pub async fn execute(self, request: Request, endpoint: Arc<BoxedHandler>) -> Response {
        let mut next: Next = Arc::new(move |req: Request| endpoint(req));

        for middleware in self.middleware.into_iter().rev() {
            let inner = next;
            next = Arc::new(move |req: Request| -> BoxedFuture {
                let middleware = middleware.clone();
                let inner = inner.clone();
                Box::pin(async move { middleware.handle(req, inner).await })
            });
        }

        next(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::testing::TestRequest;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct Record {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        answer: bool,
    }

    #[async_trait]
    impl Middleware for Record {
        async fn handle(&self, request: Request, next: Next) -> Response {
            self.log.lock().unwrap().push(self.name);
            if self.answer {
                return Ok(HttpResponse::text(self.name));
            }
            next(request).await
        }
    }

    fn endpoint(log: Arc<Mutex<Vec<&'static str>>>) -> Arc<BoxedHandler> {
        let handler: BoxedHandler = Box::new(move |_req| {
            let log = log.clone();
            Box::pin(async move {
                log.lock().unwrap().push("endpoint");
                Ok(HttpResponse::text("endpoint"))
            })
        });
        Arc::new(handler)
    }

    #[tokio::test]
    async fn test_chain_runs_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = MiddlewareChain::new();
        for name in ["first", "second"] {
            chain.push(into_boxed(Record {
                name,
                log: log.clone(),
                answer: false,
            }));
        }

        chain
            .execute(TestRequest::get("/").build(), endpoint(log.clone()))
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "endpoint"]);
    }

    #[tokio::test]
    async fn test_short_circuit_skips_downstream() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = MiddlewareChain::new();
        chain.push(into_boxed(Record {
            name: "gate",
            log: log.clone(),
            answer: true,
        }));
        chain.push(into_boxed(Record {
            name: "after",
            log: log.clone(),
            answer: false,
        }));

        let response = chain
            .execute(TestRequest::get("/").build(), endpoint(log.clone()))
            .await
            .unwrap();

        assert_eq!(response.body().as_ref(), b"gate");
        assert_eq!(*log.lock().unwrap(), vec!["gate"]);
    }
}

//! Route grouping with shared prefix and middleware

use super::router::boxed;
use super::{BoxedHandler, RouteBuilder, Router};
use crate::http::{Request, Response};
use crate::middleware::{into_boxed, BoxedMiddleware, Middleware};
use http::Method;
use std::future::Future;
use std::sync::Arc;

/// Builder for route groups with shared prefix and middleware
///
/// # Example
///
/// ```rust,ignore
/// Router::new()
///     .group("/api/products", |r| {
///         r.get("", inject(services.clone(), products::index))
///          .get("/{id}", inject(services.clone(), products::show))
///     })
///     .middleware(AuditMiddleware)
/// ```
pub struct GroupBuilder {
    outer_router: Router,
    group_routes: Vec<GroupRoute>,
    prefix: String,
    middleware: Vec<BoxedMiddleware>,
}

/// A route registered within a group
struct GroupRoute {
    method: Method,
    path: String,
    handler: Arc<BoxedHandler>,
}

impl GroupBuilder {
    /// Apply middleware to all routes in this group
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(into_boxed(middleware));
        self
    }

    /// Finalize the group and merge routes into the outer router
    fn finalize(mut self) -> Router {
        for route in self.group_routes {
            let full_path = format!("{}{}", self.prefix, route.path);
            self.outer_router
                .insert(route.method, &full_path, route.handler);

            for mw in &self.middleware {
                self.outer_router.add_middleware(&full_path, mw.clone());
            }
        }

        self.outer_router
    }

    /// Continue registering on the outer router
    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.finalize().get(path, handler)
    }

    /// Start another group after this one
    pub fn group<F>(self, prefix: &str, builder_fn: F) -> GroupBuilder
    where
        F: FnOnce(GroupRouter) -> GroupRouter,
    {
        self.finalize().group(prefix, builder_fn)
    }
}

/// Inner router used within a group closure
///
/// Captures routes without a prefix, later merged with the group's prefix.
pub struct GroupRouter {
    routes: Vec<GroupRoute>,
}

impl GroupRouter {
    fn new() -> Self {
        Self { routes: Vec::new() }
    }

    fn push<H, Fut>(mut self, method: Method, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.routes.push(GroupRoute {
            method,
            path: path.to_string(),
            handler: boxed(handler),
        });
        self
    }

    pub fn get<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.push(Method::GET, path, handler)
    }

    pub fn post<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.push(Method::POST, path, handler)
    }

    pub fn put<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.push(Method::PUT, path, handler)
    }

    pub fn delete<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.push(Method::DELETE, path, handler)
    }
}

impl Router {
    /// Create a route group with a shared prefix
    ///
    /// Middleware applied to the group is applied to every route within it.
    pub fn group<F>(self, prefix: &str, builder_fn: F) -> GroupBuilder
    where
        F: FnOnce(GroupRouter) -> GroupRouter,
    {
        let built = builder_fn(GroupRouter::new());

        GroupBuilder {
            outer_router: self,
            group_routes: built.routes,
            prefix: prefix.to_string(),
            middleware: Vec::new(),
        }
    }
}

impl From<GroupBuilder> for Router {
    fn from(builder: GroupBuilder) -> Self {
        builder.finalize()
    }
}

impl RouteBuilder {
    /// Create a route group with a shared prefix
    pub fn group<F>(self, prefix: &str, builder_fn: F) -> GroupBuilder
    where
        F: FnOnce(GroupRouter) -> GroupRouter,
    {
        self.router.group(prefix, builder_fn)
    }
}

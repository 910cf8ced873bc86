use crate::http::{ApiResponse, HttpResponse, Request, Response};
use crate::middleware::{into_boxed, BoxedMiddleware, Middleware, MiddlewareChain};
use http::Method;
use matchit::Router as MatchitRouter;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for route handlers
pub type BoxedHandler =
    Box<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

/// Box a plain async handler
pub fn boxed<H, Fut>(handler: H) -> Arc<BoxedHandler>
where
    H: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    let handler: BoxedHandler = Box::new(move |req| Box::pin(handler(req)));
    Arc::new(handler)
}

/// Bind shared state to a handler taking `(state, request)`
///
/// This is how composed services reach controllers without a global
/// container: the state is cloned into every invocation.
///
/// ```rust,ignore
/// Router::new().get("/api/products", inject(services.clone(), products::index))
/// ```
pub fn inject<S, H, Fut>(state: S, handler: H) -> impl Fn(Request) -> Fut + Send + Sync + 'static
where
    S: Clone + Send + Sync + 'static,
    H: Fn(S, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    move |req| handler(state.clone(), req)
}

#[derive(Clone)]
struct RouteEntry {
    pattern: String,
    handler: Arc<BoxedHandler>,
}

/// A matched route: handler, path parameters and route middleware
pub struct RouteMatch {
    pub handler: Arc<BoxedHandler>,
    pub params: HashMap<String, String>,
    pub middleware: Vec<BoxedMiddleware>,
}

/// HTTP Router
pub struct Router {
    routes: HashMap<Method, MatchitRouter<RouteEntry>>,
    /// Middleware assignments: path pattern -> boxed middleware instances
    route_middleware: HashMap<String, Vec<BoxedMiddleware>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            route_middleware: HashMap::new(),
        }
    }

    /// Get middleware for a route pattern (e.g. `/api/products/{id}`)
    pub fn get_route_middleware(&self, pattern: &str) -> Vec<BoxedMiddleware> {
        self.route_middleware
            .get(pattern)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn add_middleware(&mut self, pattern: &str, middleware: BoxedMiddleware) {
        self.route_middleware
            .entry(pattern.to_string())
            .or_default()
            .push(middleware);
    }

    pub(crate) fn insert(&mut self, method: Method, path: &str, handler: Arc<BoxedHandler>) {
        let entry = RouteEntry {
            pattern: path.to_string(),
            handler,
        };
        let table = self
            .routes
            .entry(method.clone())
            .or_insert_with(MatchitRouter::new);
        if let Err(e) = table.insert(path, entry) {
            tracing::warn!(%method, path, error = %e, "route not registered");
        }
    }

    /// Register a route for any method
    pub fn route<H, Fut>(mut self, method: Method, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.insert(method, path, boxed(handler));
        RouteBuilder {
            router: self,
            last_path: path.to_string(),
        }
    }

    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::GET, path, handler)
    }

    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::POST, path, handler)
    }

    pub fn put<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::PUT, path, handler)
    }

    pub fn delete<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::DELETE, path, handler)
    }

    /// Match a request and return the handler with extracted params
    ///
    /// HEAD falls back to the GET route.
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let table = match self.routes.get(method) {
            Some(table) => Some(table),
            None if *method == Method::HEAD => self.routes.get(&Method::GET),
            None => None,
        }?;

        let matched = table.at(path).ok()?;
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Some(RouteMatch {
            handler: matched.value.handler.clone(),
            params,
            middleware: self.get_route_middleware(&matched.value.pattern),
        })
    }

    /// Terminal pipeline stage: route middleware, then the handler
    pub async fn dispatch(&self, request: Request) -> Response {
        let Some(matched) = self.match_route(request.method(), request.path()) else {
            return Err(HttpResponse::json_body(&ApiResponse::new(404)).status(404));
        };

        let request = request.with_params(matched.params);
        if matched.middleware.is_empty() {
            return (matched.handler)(request).await;
        }

        let mut chain = MiddlewareChain::new();
        chain.extend(matched.middleware);
        chain.execute(request, matched.handler).await
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder returned after registering a route, enabling `.middleware()` chaining
pub struct RouteBuilder {
    pub(crate) router: Router,
    last_path: String,
}

impl RouteBuilder {
    /// Apply middleware to the most recently registered path
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// Router::new()
    ///     .get("/api/buggy/server-error", server_error).middleware(AuditMiddleware)
    /// ```
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> RouteBuilder {
        self.router
            .add_middleware(&self.last_path, into_boxed(middleware));
        self
    }

    pub fn route<H, Fut>(self, method: Method, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.route(method, path, handler)
    }

    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.get(path, handler)
    }

    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.post(path, handler)
    }

    pub fn put<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.put(path, handler)
    }

    pub fn delete<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.delete(path, handler)
    }
}

impl From<RouteBuilder> for Router {
    fn from(builder: RouteBuilder) -> Self {
        builder.router
    }
}

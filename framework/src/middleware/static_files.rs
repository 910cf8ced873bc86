use super::{Middleware, Next};
use crate::http::{HttpResponse, Request, Response};
use async_trait::async_trait;
use http::Method;
use std::path::{Component, Path, PathBuf};

/// Serves files from the web root for GET and HEAD requests
///
/// Requests that do not resolve to a regular file under the root continue
/// down the pipeline. Paths with `..` segments never leave the root.
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a request path onto the root, refusing anything that could escape it
    fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = Path::new(request_path.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        let mut depth = 0;

        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    resolved.push(segment);
                    depth += 1;
                }
                Component::CurDir => {}
                _ => return None,
            }
        }

        if depth == 0 {
            return None;
        }
        Some(resolved)
    }
}

/// Content type from the file extension
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl Middleware for StaticFiles {
    async fn handle(&self, request: Request, next: Next) -> Response {
        let is_read = request.method() == Method::GET || request.method() == Method::HEAD;
        if !is_read {
            return next(request).await;
        }

        let Some(path) = self.resolve(request.path()) else {
            return next(request).await;
        };

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            _ => return next(request).await,
        }

        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read static file");
                return next(request).await;
            }
        };

        let response = HttpResponse::bytes(contents, content_type_for(&path));
        if request.method() == Method::HEAD {
            return Ok(response.without_body());
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Pipeline;
    use crate::routing::Router;
    use crate::testing::TestRequest;
    use pretty_assertions::assert_eq;

    const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/wwwroot");

    fn pipeline() -> Pipeline {
        let router: Router = Router::new()
            .get("/api/products", |_req| async { crate::http::text("products") })
            .into();
        Pipeline::new(router).stage(StaticFiles::new(FIXTURES))
    }

    #[tokio::test]
    async fn test_serves_existing_file() {
        let response = pipeline().handle(TestRequest::get("/hello.txt").build()).await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.header_value("content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(response.body().as_ref(), b"hello from wwwroot\n");
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let response = pipeline().handle(TestRequest::head("/hello.txt").build()).await;

        assert_eq!(response.status_code(), 200);
        assert!(response.body().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_files_fall_through() {
        let pipeline = pipeline();

        let routed = pipeline.handle(TestRequest::get("/api/products").build()).await;
        assert_eq!(routed.body().as_ref(), b"products");

        let missing = pipeline.handle(TestRequest::get("/missing.png").build()).await;
        assert_eq!(missing.status_code(), 404);
    }

    #[test]
    fn test_traversal_is_refused() {
        let files = StaticFiles::new("/srv/wwwroot");

        assert_eq!(files.resolve("/../etc/passwd"), None);
        assert_eq!(files.resolve("/images/../../secret"), None);
        assert_eq!(files.resolve("/"), None);
        assert_eq!(
            files.resolve("/images/products/sb-ang1.png"),
            Some(PathBuf::from("/srv/wwwroot/images/products/sb-ang1.png"))
        );
    }
}

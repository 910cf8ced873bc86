use super::{Middleware, Next};
use crate::http::{ApiResponse, HttpResponse, Redirect, Request, Response};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// Redirects plain-HTTP requests to their HTTPS equivalent with a 307
///
/// TLS terminates in front of the app, so a request counts as secure when
/// `X-Forwarded-Proto` says so. Without a configured HTTPS port the stage
/// cannot build a target; it warns once and lets requests through.
pub struct HttpsRedirection {
    https_port: Option<u16>,
    warned: AtomicBool,
}

impl HttpsRedirection {
    pub fn new(https_port: Option<u16>) -> Self {
        Self {
            https_port,
            warned: AtomicBool::new(false),
        }
    }

    fn target(&self, host: &str, port: u16, request: &Request) -> String {
        let host = strip_port(host);
        let path = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        if port == 443 {
            format!("https://{}{}", host, path)
        } else {
            format!("https://{}:{}{}", host, port, path)
        }
    }
}

/// Host without its port; bracketed IPv6 literals keep their brackets
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    host.split(':').next().unwrap_or(host)
}

#[async_trait]
impl Middleware for HttpsRedirection {
    async fn handle(&self, request: Request, next: Next) -> Response {
        if request.is_secure() {
            return next(request).await;
        }

        let Some(port) = self.https_port else {
            if !self.warned.swap(true, Ordering::Relaxed) {
                tracing::warn!("Failed to determine the https port for redirect; set HTTPS_PORT");
            }
            return next(request).await;
        };

        let Some(host) = request.host() else {
            return Err(HttpResponse::json_body(&ApiResponse::with_message(
                400,
                "Missing Host header",
            ))
            .status(400));
        };

        let location = self.target(host, port, &request);
        tracing::debug!(%location, "redirecting to https");
        Err(Redirect::to(location).preserve_method().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Pipeline;
    use crate::routing::Router;
    use crate::testing::TestRequest;
    use pretty_assertions::assert_eq;

    fn pipeline(port: Option<u16>) -> Pipeline {
        let router: Router = Router::new()
            .get("/api/products", |_req| async { crate::http::text("products") })
            .into();
        Pipeline::new(router).stage(HttpsRedirection::new(port))
    }

    #[tokio::test]
    async fn test_plain_request_is_redirected() {
        let response = pipeline(Some(8443))
            .handle(
                TestRequest::get("/api/products?pageIndex=2")
                    .header("Host", "shop.example:8080")
                    .build(),
            )
            .await;

        assert_eq!(response.status_code(), 307);
        assert_eq!(
            response.header_value("location"),
            Some("https://shop.example:8443/api/products?pageIndex=2")
        );
    }

    #[tokio::test]
    async fn test_default_port_is_omitted() {
        let response = pipeline(Some(443))
            .handle(TestRequest::get("/api/products").header("Host", "shop.example").build())
            .await;

        assert_eq!(response.header_value("location"), Some("https://shop.example/api/products"));
    }

    #[tokio::test]
    async fn test_secure_request_passes() {
        let response = pipeline(Some(443))
            .handle(
                TestRequest::get("/api/products")
                    .header("Host", "shop.example")
                    .header("X-Forwarded-Proto", "https")
                    .build(),
            )
            .await;

        assert_eq!(response.status_code(), 200);
    }

    #[tokio::test]
    async fn test_without_port_passes_through() {
        let response = pipeline(None)
            .handle(TestRequest::get("/api/products").header("Host", "shop.example").build())
            .await;

        assert_eq!(response.status_code(), 200);
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("shop.example:8080"), "shop.example");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
        assert_eq!(strip_port("shop.example"), "shop.example");
    }
}

use super::{Middleware, Next};
use crate::error::FrameworkError;
use crate::http::{HttpResponse, Redirect, Request, Response};
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use std::sync::Arc;
use utoipa_swagger_ui::Config;

const DOCUMENT_PATH: &str = "/swagger/v1/swagger.json";
const UI_PATH: &str = "/swagger";

/// Serves the OpenAPI document and the vendored Swagger UI
///
/// Only registered in development; in other environments the paths fall
/// through to routing and 404.
pub struct ApiDocs {
    document: Bytes,
    ui: Arc<Config<'static>>,
}

impl ApiDocs {
    pub fn new(openapi: utoipa::openapi::OpenApi) -> Result<Self, FrameworkError> {
        let document = openapi
            .to_json()
            .map_err(|e| FrameworkError::internal(format!("Failed to render OpenAPI document: {}", e)))?;

        Ok(Self {
            document: Bytes::from(document),
            ui: Arc::new(Config::from(DOCUMENT_PATH)),
        })
    }

    /// A Swagger UI asset; `file` is the path below `/swagger/`
    fn asset(&self, file: &str) -> Result<Option<HttpResponse>, FrameworkError> {
        let served = utoipa_swagger_ui::serve(file, self.ui.clone())
            .map_err(|e| FrameworkError::internal(format!("Failed to serve Swagger UI: {}", e)))?;

        Ok(served.map(|file| HttpResponse::bytes(file.bytes.into_owned(), &file.content_type)))
    }
}

#[async_trait]
impl Middleware for ApiDocs {
    async fn handle(&self, request: Request, next: Next) -> Response {
        if request.method() != Method::GET && request.method() != Method::HEAD {
            return next(request).await;
        }

        let path = request.path();
        let response = if path == DOCUMENT_PATH {
            HttpResponse::bytes(self.document.clone(), "application/json; charset=utf-8")
        } else if path == UI_PATH {
            // the UI loads its assets relative to the directory
            return Redirect::to(format!("{}/", UI_PATH)).permanent().into();
        } else if let Some(file) = path.strip_prefix("/swagger/") {
            match self.asset(file)? {
                Some(response) => response,
                None => return next(request).await,
            }
        } else {
            return next(request).await;
        };

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
    use utoipa::openapi::{InfoBuilder, OpenApiBuilder};

    fn docs() -> ApiDocs {
        let openapi = OpenApiBuilder::new()
            .info(InfoBuilder::new().title("Storefront").version("v1").build())
            .build();
        ApiDocs::new(openapi).unwrap()
    }

    #[tokio::test]
    async fn test_serves_document_and_page() {
        let pipeline = Pipeline::new(Router::new()).stage(docs());

        let document = pipeline
            .handle(TestRequest::get("/swagger/v1/swagger.json").build())
            .await;
        assert_eq!(document.status_code(), 200);
        let body: serde_json::Value = serde_json::from_slice(document.body()).unwrap();
        assert_eq!(body["info"]["title"], "Storefront");

        let page = pipeline.handle(TestRequest::get("/swagger/").build()).await;
        assert_eq!(page.status_code(), 200);
        assert!(page
            .header_value("Content-Type")
            .unwrap()
            .starts_with("text/html"));
        assert!(String::from_utf8_lossy(page.body()).contains("swagger-ui"));
    }

    #[tokio::test]
    async fn test_ui_assets_are_vendored() {
        let pipeline = Pipeline::new(Router::new()).stage(docs());

        let redirect = pipeline.handle(TestRequest::get("/swagger").build()).await;
        assert_eq!(redirect.status_code(), 301);
        assert_eq!(redirect.header_value("Location"), Some("/swagger/"));

        let bundle = pipeline
            .handle(TestRequest::get("/swagger/swagger-ui-bundle.js").build())
            .await;
        assert_eq!(bundle.status_code(), 200);
        assert!(!bundle.body().is_empty());

        let initializer = pipeline
            .handle(TestRequest::get("/swagger/swagger-initializer.js").build())
            .await;
        assert_eq!(initializer.status_code(), 200);
        assert!(String::from_utf8_lossy(initializer.body()).contains(DOCUMENT_PATH));

        let missing = pipeline
            .handle(TestRequest::get("/swagger/not-a-file.js").build())
            .await;
        assert_eq!(missing.status_code(), 404);
    }

    #[tokio::test]
    async fn test_other_paths_fall_through() {
        let pipeline = Pipeline::new(Router::new()).stage(docs());

        let response = pipeline.handle(TestRequest::get("/api/products").build()).await;
        assert_eq!(response.status_code(), 404);
    }
}

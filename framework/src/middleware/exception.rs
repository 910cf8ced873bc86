use super::{Middleware, Next};
use crate::config::Environment;
use crate::http::{ApiExceptionResponse, HttpResponse, Request, Response};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// Outermost stage: turns panics and exception responses into `ApiExceptionResponse`
///
/// Anything downstream that panics, or returns a response flagged with
/// `HttpResponse::with_exception`, is logged and answered with the exception
/// shape. The failure detail is only exposed in development.
pub struct ExceptionMiddleware {
    expose_details: bool,
}

impl ExceptionMiddleware {
    pub fn new(environment: &Environment) -> Self {
        Self {
            expose_details: environment.is_development(),
        }
    }

    fn translate(&self, status: u16, detail: String, method: &str, path: &str) -> HttpResponse {
        tracing::error!(method, path, status, error = %detail, "unhandled exception");

        let details = self.expose_details.then_some(detail);
        HttpResponse::json_body(&ApiExceptionResponse::new(status, None, details)).status(status)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}

#[async_trait]
impl Middleware for ExceptionMiddleware {
    async fn handle(&self, request: Request, next: Next) -> Response {
        let method = request.method().to_string();
        let path = request.path().to_string();

        match AssertUnwindSafe(next(request)).catch_unwind().await {
            Ok(Ok(response)) | Ok(Err(response)) => match response.exception() {
                Some(detail) => {
                    let detail = detail.to_string();
                    Err(self.translate(response.status_code(), detail, &method, &path))
                }
                None => Ok(response),
            },
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                Err(self.translate(500, detail, &method, &path))
            }
        }
    }
}

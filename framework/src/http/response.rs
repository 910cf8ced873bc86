use super::api_response::{ApiExceptionResponse, ApiResponse, ApiValidationErrorResponse};
use crate::error::{AppError, FrameworkError};
use bytes::Bytes;
use http_body_util::Full;
use serde::Serialize;

/// HTTP Response builder
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    body: Bytes,
    headers: Vec<(String, String)>,
    exception: Option<String>,
}

/// Response type alias - allows using `?` operator for early returns
pub type Response = Result<HttpResponse, HttpResponse>;

impl HttpResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            body: Bytes::new(),
            headers: Vec::new(),
            exception: None,
        }
    }

    /// Create a response with a string body
    pub fn text(body: impl Into<String>) -> Self {
        Self::bytes(body.into(), "text/plain; charset=utf-8")
    }

    /// Create a JSON response from a serde_json::Value
    pub fn json(body: serde_json::Value) -> Self {
        Self::bytes(body.to_string(), "application/json; charset=utf-8")
    }

    /// Serialize any value as the JSON body
    pub fn json_body<T: Serialize + ?Sized>(body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => Self::bytes(bytes, "application/json; charset=utf-8"),
            Err(e) => Self::text("Failed to serialize response")
                .status(500)
                .with_exception(e.to_string()),
        }
    }

    /// Raw body with an explicit content type
    pub fn bytes(body: impl Into<Bytes>, content_type: &str) -> Self {
        Self {
            status: 200,
            body: body.into(),
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            exception: None,
        }
    }

    /// Set the HTTP status code
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Add a header to the response
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Mark this response as the result of an unhandled failure
    pub fn with_exception(mut self, detail: impl Into<String>) -> Self {
        self.exception = Some(detail.into());
        self
    }

    /// Drop the body, keeping status and headers (HEAD requests)
    pub fn without_body(mut self) -> Self {
        self.body = Bytes::new();
        self
    }

    /// Wrap this response in Ok() for use as Response type
    pub fn ok(self) -> Response {
        Ok(self)
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// First header value with the given name, case-insensitive
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn exception(&self) -> Option<&str> {
        self.exception.as_deref()
    }

    /// Convert to hyper response
    pub fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        let mut builder = hyper::Response::builder().status(self.status);

        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }

        builder.body(Full::new(self.body)).unwrap_or_else(|_| {
            let mut fallback = hyper::Response::new(Full::new(Bytes::from_static(
                b"Failed to build response",
            )));
            *fallback.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension trait for Response to enable method chaining
pub trait ResponseExt {
    fn status(self, code: u16) -> Self;
    fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self;
}

impl ResponseExt for Response {
    fn status(self, code: u16) -> Self {
        self.map(|r| r.status(code))
    }

    fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.map(|r| r.header(name, value))
    }
}

/// HTTP Redirect response builder
pub struct Redirect {
    location: String,
    status: u16,
}

impl Redirect {
    /// Create a redirect to a specific URL/path
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            status: 302,
        }
    }

    /// Set status to 301 (Moved Permanently)
    pub fn permanent(mut self) -> Self {
        self.status = 301;
        self
    }

    /// Set status to 307 so clients replay the same method and body
    pub fn preserve_method(mut self) -> Self {
        self.status = 307;
        self
    }
}

impl From<Redirect> for HttpResponse {
    fn from(redirect: Redirect) -> HttpResponse {
        HttpResponse::new()
            .status(redirect.status)
            .header("Location", redirect.location)
    }
}

/// Auto-convert Redirect to Response
impl From<Redirect> for Response {
    fn from(redirect: Redirect) -> Response {
        Ok(HttpResponse::from(redirect))
    }
}

/// Auto-convert FrameworkError to HttpResponse
///
/// Validation and binding failures become `ApiValidationErrorResponse`,
/// exceptions (5xx) become `ApiExceptionResponse` and are flagged for the
/// exception stage, everything else is an `ApiResponse`.
impl From<FrameworkError> for HttpResponse {
    fn from(err: FrameworkError) -> HttpResponse {
        let status = err.status_code();
        match err {
            FrameworkError::Validation(errors) => {
                HttpResponse::json_body(&ApiValidationErrorResponse::new(errors.messages()))
                    .status(status)
            }
            FrameworkError::ParamParse { .. } => {
                HttpResponse::json_body(&ApiValidationErrorResponse::new(vec![err.to_string()]))
                    .status(status)
            }
            err if err.is_exception() => {
                HttpResponse::json_body(&ApiExceptionResponse::new(status, None, None))
                    .status(status)
                    .with_exception(err.to_string())
            }
            FrameworkError::ModelNotFound { .. } => {
                HttpResponse::json_body(&ApiResponse::new(status)).status(status)
            }
            other => {
                HttpResponse::json_body(&ApiResponse::with_message(status, other.to_string()))
                    .status(status)
            }
        }
    }
}

impl From<AppError> for HttpResponse {
    fn from(err: AppError) -> HttpResponse {
        let framework_err: FrameworkError = err.into();
        framework_err.into()
    }
}

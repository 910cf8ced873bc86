mod api_response;
mod body;
mod form_request;
mod request;
mod response;

pub use api_response::{
    default_message, ApiExceptionResponse, ApiResponse, ApiValidationErrorResponse,
};
pub use body::{collect_body, parse_form, parse_json, parse_query};
pub use form_request::{validated, FormRequest};
pub use request::Request;
pub use response::{HttpResponse, Redirect, Response, ResponseExt};

/// Create a text response
pub fn text(body: impl Into<String>) -> Response {
    Ok(HttpResponse::text(body))
}

/// Create a JSON response from a serde_json::Value
pub fn json(body: serde_json::Value) -> Response {
    Ok(HttpResponse::json(body))
}

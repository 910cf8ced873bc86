//! JSON error envelopes returned to API clients

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default message for a status code when none is supplied
pub fn default_message(status_code: u16) -> &'static str {
    match status_code {
        400 => "A bad request, you have made",
        401 => "Authorized, you are not",
        404 => "Resource was not found",
        500 => "Errors are the path to the dark side. Errors lead to anger. Anger leads to hate. Hate leads to career change",
        _ => "",
    }
}

/// Basic `{ statusCode, message }` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub message: String,
}

impl ApiResponse {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            message: default_message(status_code).to_string(),
        }
    }

    pub fn with_message(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            return Self::new(status_code);
        }
        Self {
            status_code,
            message,
        }
    }
}

/// 400 response listing every validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiValidationErrorResponse {
    pub status_code: u16,
    pub message: String,
    pub errors: Vec<String>,
}

impl ApiValidationErrorResponse {
    pub fn new(errors: Vec<String>) -> Self {
        Self {
            status_code: 400,
            message: default_message(400).to_string(),
            errors,
        }
    }
}

/// Response for unhandled failures; `details` is only filled in development
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiExceptionResponse {
    pub status_code: u16,
    pub message: String,
    pub details: Option<String>,
}

impl ApiExceptionResponse {
    pub fn new(status_code: u16, message: Option<String>, details: Option<String>) -> Self {
        Self {
            status_code,
            message: message.unwrap_or_else(|| default_message(status_code).to_string()),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_messages() {
        assert_eq!(ApiResponse::new(401).message, "Authorized, you are not");
        assert_eq!(ApiResponse::new(404).message, "Resource was not found");
        assert_eq!(ApiResponse::new(418).message, "");
        assert_eq!(ApiResponse::with_message(404, "").message, "Resource was not found");
    }

    #[test]
    fn test_camel_case_shape() {
        let body = serde_json::to_value(ApiValidationErrorResponse::new(vec!["a".into()])).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "statusCode": 400,
                "message": "A bad request, you have made",
                "errors": ["a"]
            })
        );
    }
}

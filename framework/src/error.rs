//! Framework-wide error types
//!
//! Provides a unified error type that can be used throughout the framework
//! and automatically converts to the storefront's JSON error shapes.

use thiserror::Error;

/// Simple wrapper for creating one-off domain errors
///
/// # Example
///
/// ```rust,ignore
/// use kit::{AppError, FrameworkError};
///
/// pub async fn process() -> Result<(), FrameworkError> {
///     if invalid {
///         return Err(AppError::bad_request("Invalid input").into());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AppError {
    message: String,
    status_code: u16,
}

impl AppError {
    /// Create a new AppError with status 500 (Internal Server Error)
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: 500,
        }
    }

    /// Set the HTTP status code
    pub fn status(mut self, code: u16) -> Self {
        self.status_code = code;
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message).status(404)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message).status(400)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(message).status(401)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(message).status(409)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl From<AppError> for FrameworkError {
    fn from(e: AppError) -> Self {
        FrameworkError::Domain {
            message: e.message,
            status_code: e.status_code,
        }
    }
}

/// A single failed rule or binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validation failures in the order they are reported to the client
///
/// Fields are sorted by name; messages for one field keep the order the
/// rules were declared in. Serialised as the `errors` array of an
/// `ApiValidationErrorResponse`, one entry per failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a binding failure on one field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Add an error for a specific field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Flat list of messages, one per failure
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    /// Convert from validator crate's ValidationErrors
    pub fn from_validator(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors
            .field_errors()
            .into_iter()
            .map(|(field, field_errors)| (field.to_string(), field_errors.clone()))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut result = Self::new();
        for (field, field_errors) in fields {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("The {} field is invalid.", field));
                result.add(field.clone(), message);
            }
        }
        result
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation failed: {}", self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Framework-wide error type
///
/// Implements `From<FrameworkError> for HttpResponse` so errors can be
/// propagated with `?` in controller handlers. Statuses of 500 and above are
/// flagged as exceptions and rendered by the exception stage.
#[derive(Debug, Clone, Error)]
pub enum FrameworkError {
    /// Parameter extraction failed (missing route parameter)
    #[error("Missing required parameter: {param_name}")]
    ParamError { param_name: String },

    /// Route parameter could not be parsed into the expected type
    #[error("The value '{value}' is not valid for {param}.")]
    ParamParse { param: String, value: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Domain/application error with custom status code
    #[error("{message}")]
    Domain { message: String, status_code: u16 },

    /// Request validation failures (400 Bad Request)
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Authorization failed (403 Forbidden)
    ///
    /// Used when FormRequest::authorize() returns false.
    #[error("This action is unauthorized.")]
    Unauthorized,

    #[error("{model_name} not found")]
    ModelNotFound { model_name: String },
}

impl FrameworkError {
    /// Create a ParamError for a missing parameter
    pub fn param(name: impl Into<String>) -> Self {
        Self::ParamError {
            param_name: name.into(),
        }
    }

    pub fn param_parse(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ParamParse {
            param: param.into(),
            value: value.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a Domain error with custom status code
    pub fn domain(message: impl Into<String>, status_code: u16) -> Self {
        Self::Domain {
            message: message.into(),
            status_code,
        }
    }

    /// Single-field validation failure
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(ValidationErrors::single(field, message))
    }

    pub fn model_not_found(name: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model_name: name.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ParamError { .. } => 400,
            Self::ParamParse { .. } => 400,
            Self::Database(_) => 500,
            Self::Internal { .. } => 500,
            Self::Config(_) => 500,
            Self::Domain { status_code, .. } => *status_code,
            Self::Validation(_) => 400,
            Self::Unauthorized => 403,
            Self::ModelNotFound { .. } => 404,
        }
    }

    /// Whether this error is an unhandled failure rather than a client error
    pub fn is_exception(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<sea_orm::DbErr> for FrameworkError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<std::io::Error> for FrameworkError {
    fn from(e: std::io::Error) -> Self {
        Self::internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(length(min = 3, message = "Name is too short"))]
        name: String,
        #[validate(range(min = 18))]
        age: u32,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_from_validator_sorts_fields() {
        let signup = Signup {
            name: "al".into(),
            age: 12,
            email: "not-an-email".into(),
        };
        let errors = ValidationErrors::from_validator(signup.validate().unwrap_err());

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["age", "email", "name"]);
        assert_eq!(
            errors.messages(),
            vec![
                "The age field is invalid.".to_string(),
                "The email field is invalid.".to_string(),
                "Name is too short".to_string(),
            ]
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(FrameworkError::param("id").status_code(), 400);
        assert_eq!(FrameworkError::validation("id", "bad").status_code(), 400);
        assert_eq!(FrameworkError::model_not_found("Product").status_code(), 404);
        assert_eq!(FrameworkError::Unauthorized.status_code(), 403);
        assert_eq!(FrameworkError::domain("teapot", 418).status_code(), 418);
        assert!(FrameworkError::database("gone").is_exception());
        assert!(!FrameworkError::model_not_found("Product").is_exception());
    }

    #[test]
    fn test_app_error_converts_to_domain() {
        let err: FrameworkError = AppError::conflict("Already exists").into();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.to_string(), "Already exists");
    }
}

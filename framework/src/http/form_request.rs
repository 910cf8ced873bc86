//! FormRequest trait for validated request data
//!
//! Body parsing, validation and authorization in one step, so a handler only
//! ever sees data that passed its rules. Failures are reported as a single
//! `FrameworkError::Validation` listing every message.

use super::Request;
use crate::error::{FrameworkError, ValidationErrors};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Trait for validated form/JSON request data
///
/// # Example
///
/// ```rust,ignore
/// use kit::FormRequest;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// pub struct CreateBrandRequest {
///     #[validate(length(min = 1, max = 50))]
///     pub name: String,
/// }
///
/// impl FormRequest for CreateBrandRequest {}
///
/// pub async fn store(services: AppServices, req: Request) -> Response {
///     let form = CreateBrandRequest::extract(&req)?; // 400 with every message if invalid
///     // ...
/// }
/// ```
pub trait FormRequest: Sized + DeserializeOwned + Validate {
    /// Check if the request is authorized
    ///
    /// Returning `false` results in a 403 Forbidden response.
    fn authorize(_req: &Request) -> bool {
        true
    }

    /// Authorize, parse the body (JSON or form based on Content-Type) and validate
    fn extract(req: &Request) -> Result<Self, FrameworkError> {
        if !Self::authorize(req) {
            return Err(FrameworkError::Unauthorized);
        }

        validated(req.input::<Self>()?)
    }
}

/// Run `validator` rules on already-bound data
pub fn validated<T: Validate>(data: T) -> Result<T, FrameworkError> {
    match data.validate() {
        Ok(()) => Ok(data),
        Err(errors) => Err(FrameworkError::Validation(ValidationErrors::from_validator(
            errors,
        ))),
    }
}

impl Request {
    /// Bind the query string into `T` and validate it
    pub fn validated_query<T: DeserializeOwned + Validate>(&self) -> Result<T, FrameworkError> {
        validated(self.query::<T>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestRequest;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct CreateBrand {
        #[validate(length(min = 2, message = "Name needs two characters"))]
        name: String,
        #[validate(range(min = 1))]
        rank: i32,
    }

    impl FormRequest for CreateBrand {}

    #[derive(Debug, Deserialize, Validate)]
    struct LockedBrand {
        #[allow(dead_code)]
        name: String,
    }

    impl FormRequest for LockedBrand {
        fn authorize(_req: &Request) -> bool {
            false
        }
    }

    #[test]
    fn test_extract_reports_every_failure() {
        let request = TestRequest::post("/brands")
            .json(serde_json::json!({ "name": "x", "rank": 0 }))
            .build();

        match CreateBrand::extract(&request) {
            Err(FrameworkError::Validation(errors)) => assert_eq!(
                errors.messages(),
                vec![
                    "Name needs two characters".to_string(),
                    "The rank field is invalid.".to_string(),
                ]
            ),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_accepts_form_bodies() {
        let request = TestRequest::post("/brands")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("name=Angular&rank=2")
            .build();

        let brand = CreateBrand::extract(&request).unwrap();
        assert_eq!(brand.name, "Angular");
        assert_eq!(brand.rank, 2);
    }

    #[test]
    fn test_unauthorized_form_request() {
        let request = TestRequest::post("/brands")
            .json(serde_json::json!({ "name": "x" }))
            .build();

        let err = LockedBrand::extract(&request).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}

//! Request payloads and query parameters, with their validation rules

use kit::{FormRequest, Request};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: u64 = 5;
pub const MAX_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100, message = "The Name field is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "The Description field is required."))]
    pub description: String,
    #[serde(default)]
    pub picture_url: String,
    #[validate(range(min = 0.01, message = "Price must be greater than zero."))]
    pub price: f64,
    #[validate(range(min = 1, message = "The BrandId field must reference a brand."))]
    pub brand_id: i32,
    #[validate(range(min = 1, message = "The CategoryId field must reference a category."))]
    pub category_id: i32,
}

impl FormRequest for CreateProductRequest {}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 100, message = "The Name field is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "The Description field is required."))]
    pub description: String,
    #[serde(default)]
    pub picture_url: String,
    #[validate(range(min = 0.01, message = "Price must be greater than zero."))]
    pub price: f64,
    #[validate(range(min = 1, message = "The BrandId field must reference a brand."))]
    pub brand_id: i32,
    #[validate(range(min = 1, message = "The CategoryId field must reference a category."))]
    pub category_id: i32,
}

impl FormRequest for UpdateProductRequest {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ProductSort {
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
}

/// Query string of `GET /api/products`
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductSpecParams {
    pub sort: Option<ProductSort>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    /// Case-insensitive match anywhere in the name
    pub search: Option<String>,
    #[validate(range(
        min = 1,
        max = 1_000_000,
        message = "The PageIndex field must be between 1 and 1000000."
    ))]
    pub page_index: Option<u64>,
    /// Capped at 10
    #[validate(range(min = 1, message = "The PageSize field must be at least 1."))]
    pub page_size: Option<u64>,
}

impl ProductSpecParams {
    pub fn from_request(req: &Request) -> Result<Self, kit::FrameworkError> {
        req.validated_query()
    }

    pub fn sort(&self) -> ProductSort {
        self.sort.unwrap_or_default()
    }

    pub fn page_index(&self) -> u64 {
        self.page_index.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Lowercased, trimmed search term; `None` when blank
    pub fn search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    pub fn skip(&self) -> u64 {
        (self.page_index() - 1).saturating_mul(self.page_size())
    }
}

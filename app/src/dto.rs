//! Outward representations returned by the API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductToReturnDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Absolute URL, or empty when the product has no picture
    pub picture_url: String,
    pub price: f64,
    pub brand_id: i32,
    pub brand: String,
    pub category_id: i32,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BrandDto {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
}

/// One page of results plus the total number of matching rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination<T> {
    pub page_index: u64,
    pub page_size: u64,
    pub count: u64,
    pub data: Vec<T>,
}

impl<T> Pagination<T> {
    pub fn new(page_index: u64, page_size: u64, count: u64, data: Vec<T>) -> Self {
        Self {
            page_index,
            page_size,
            count,
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    pub status: String,
}

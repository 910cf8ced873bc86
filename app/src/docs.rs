//! OpenAPI document served by the docs stage in development

use crate::controllers::{buggy, health, products};
use crate::dto::{BrandDto, CategoryDto, HealthDto, ProductToReturnDto};
use crate::requests::{CreateProductRequest, ProductSort, UpdateProductRequest};
use kit::{ApiExceptionResponse, ApiResponse, ApiValidationErrorResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(title = "Talabat.APIs", version = "v1"),
    paths(
        products::index,
        products::show,
        products::brands,
        products::categories,
        products::store,
        products::update,
        products::destroy,
        buggy::not_found,
        buggy::server_error,
        buggy::bad_request,
        buggy::bad_request_with_id,
        health::ping,
    ),
    components(schemas(
        ProductToReturnDto,
        BrandDto,
        CategoryDto,
        HealthDto,
        CreateProductRequest,
        UpdateProductRequest,
        ProductSort,
        ApiResponse,
        ApiValidationErrorResponse,
        ApiExceptionResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "products", description = "Product catalogue"),
        (name = "buggy", description = "Error shape samples"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

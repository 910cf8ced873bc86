//! Product catalogue endpoints

use crate::bootstrap::AppServices;
use crate::catalog::{one_with_relations, with_relations};
use crate::dto::{BrandDto, CategoryDto, Pagination, ProductToReturnDto};
use crate::models::{product, product_brand, product_category};
use crate::requests::{CreateProductRequest, ProductSpecParams, UpdateProductRequest};
use crate::specifications::products_with_filters;
use kit::{
    ApiResponse, ApiValidationErrorResponse, FormRequest, FrameworkError, HttpResponse, Request,
    Response, StoreContext, ValidationErrors,
};
use sea_orm::Set;

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductSpecParams),
    responses(
        (status = 200, body = Pagination<ProductToReturnDto>),
        (status = 400, body = ApiValidationErrorResponse)
    ),
    tag = "products"
)]
pub async fn index(services: AppServices, req: Request) -> Response {
    let params = ProductSpecParams::from_request(&req)?;
    let spec = products_with_filters(&params);

    let store = services.store();
    let products = store.set::<product::Entity>();
    let page = products.get_all_with_spec(&spec).await?;
    let count = products.count_with_spec(&spec).await?;

    let data: Vec<ProductToReturnDto> = services
        .mapper()
        .map_all(with_relations(&store, page).await?);

    Ok(HttpResponse::json_body(&Pagination::new(
        params.page_index(),
        params.page_size(),
        count,
        data,
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, body = ProductToReturnDto),
        (status = 400, body = ApiValidationErrorResponse),
        (status = 404, body = ApiResponse)
    ),
    tag = "products"
)]
pub async fn show(services: AppServices, req: Request) -> Response {
    let id: i32 = req.param_as("id")?;
    let store = services.store();
    let product = find_product(&store, id).await?;

    let dto: ProductToReturnDto = services
        .mapper()
        .map(one_with_relations(&store, product).await?);
    Ok(HttpResponse::json_body(&dto))
}

#[utoipa::path(
    get,
    path = "/api/products/brands",
    responses((status = 200, body = Vec<BrandDto>)),
    tag = "products"
)]
pub async fn brands(services: AppServices, _req: Request) -> Response {
    let brands = services
        .store()
        .set::<product_brand::Entity>()
        .get_all()
        .await?;
    let dtos: Vec<BrandDto> = services.mapper().map_all(brands);
    Ok(HttpResponse::json_body(&dtos))
}

#[utoipa::path(
    get,
    path = "/api/products/categories",
    responses((status = 200, body = Vec<CategoryDto>)),
    tag = "products"
)]
pub async fn categories(services: AppServices, _req: Request) -> Response {
    let categories = services
        .store()
        .set::<product_category::Entity>()
        .get_all()
        .await?;
    let dtos: Vec<CategoryDto> = services.mapper().map_all(categories);
    Ok(HttpResponse::json_body(&dtos))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, body = ProductToReturnDto),
        (status = 400, body = ApiValidationErrorResponse),
        (status = 401, body = ApiResponse)
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn store(services: AppServices, req: Request) -> Response {
    let form = CreateProductRequest::extract(&req)?;
    let store = services.store();
    ensure_references(&store, form.brand_id, form.category_id).await?;

    let created = store.set::<product::Entity>().add(product::ActiveModel {
        name: Set(form.name),
        description: Set(form.description),
        picture_url: Set(form.picture_url),
        price: Set(form.price),
        brand_id: Set(form.brand_id),
        category_id: Set(form.category_id),
        ..Default::default()
    });
    store.save().await?;

    let product = created.saved()?;
    tracing::info!(product_id = product.id, "product created");

    let dto: ProductToReturnDto = services
        .mapper()
        .map(one_with_relations(&store, product).await?);
    Ok(HttpResponse::json_body(&dto).status(201))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, body = ProductToReturnDto),
        (status = 400, body = ApiValidationErrorResponse),
        (status = 401, body = ApiResponse),
        (status = 404, body = ApiResponse)
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn update(services: AppServices, req: Request) -> Response {
    let id: i32 = req.param_as("id")?;
    let form = UpdateProductRequest::extract(&req)?;
    let store = services.store();
    let existing = find_product(&store, id).await?;
    ensure_references(&store, form.brand_id, form.category_id).await?;

    let mut changes: product::ActiveModel = existing.into();
    changes.name = Set(form.name);
    changes.description = Set(form.description);
    changes.picture_url = Set(form.picture_url);
    changes.price = Set(form.price);
    changes.brand_id = Set(form.brand_id);
    changes.category_id = Set(form.category_id);

    let updated = store.set::<product::Entity>().update(changes);
    store.save().await?;

    let dto: ProductToReturnDto = services
        .mapper()
        .map(one_with_relations(&store, updated.saved()?).await?);
    Ok(HttpResponse::json_body(&dto))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, body = ApiResponse),
        (status = 404, body = ApiResponse)
    ),
    security(("bearer" = [])),
    tag = "products"
)]
pub async fn destroy(services: AppServices, req: Request) -> Response {
    let id: i32 = req.param_as("id")?;
    let store = services.store();
    let existing = find_product(&store, id).await?;

    store.set::<product::Entity>().remove(existing);
    store.save().await?;

    tracing::info!(product_id = id, "product deleted");
    Ok(HttpResponse::new().status(204))
}

async fn find_product(store: &StoreContext, id: i32) -> Result<product::Model, FrameworkError> {
    store
        .set::<product::Entity>()
        .get_by_id(id)
        .await?
        .ok_or_else(|| FrameworkError::model_not_found("Product"))
}

/// Unknown brand or category ids are reported together as validation errors
async fn ensure_references(
    store: &StoreContext,
    brand_id: i32,
    category_id: i32,
) -> Result<(), FrameworkError> {
    let mut errors = ValidationErrors::new();

    if store
        .set::<product_brand::Entity>()
        .get_by_id(brand_id)
        .await?
        .is_none()
    {
        errors.add("brand_id", format!("Brand {} does not exist.", brand_id));
    }
    if store
        .set::<product_category::Entity>()
        .get_by_id(category_id)
        .await?
        .is_none()
    {
        errors.add("category_id", format!("Category {} does not exist.", category_id));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(FrameworkError::Validation(errors))
    }
}

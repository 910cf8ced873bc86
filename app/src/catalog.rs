//! Products joined with their brand and category

use crate::models::{product, product_brand, product_category};
use kit::{FrameworkError, StoreContext};
use sea_orm::LoaderTrait;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductWithRelations {
    pub product: product::Model,
    pub brand: Option<product_brand::Model>,
    pub category: Option<product_category::Model>,
}

/// Load the brand and category of every product, keeping order
///
/// Two extra queries regardless of how many products are passed.
pub async fn with_relations(
    store: &StoreContext,
    products: Vec<product::Model>,
) -> Result<Vec<ProductWithRelations>, FrameworkError> {
    let conn = store.connection();
    let brands = products.load_one(product_brand::Entity, conn).await?;
    let categories = products.load_one(product_category::Entity, conn).await?;

    Ok(products
        .into_iter()
        .zip(brands)
        .zip(categories)
        .map(|((product, brand), category)| ProductWithRelations {
            product,
            brand,
            category,
        })
        .collect())
}

pub async fn one_with_relations(
    store: &StoreContext,
    product: product::Model,
) -> Result<ProductWithRelations, FrameworkError> {
    with_relations(store, vec![product])
        .await?
        .pop()
        .ok_or_else(|| FrameworkError::internal("product vanished while loading relations"))
}

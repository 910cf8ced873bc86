//! Reference data seeded on startup
//!
//! Each table is filled from the embedded JSON only while it is empty, so
//! running the seeder again inserts nothing. Products name their brand and
//! category; the names are resolved against the stored rows.

use crate::models::{product, product_brand, product_category};
use kit::{async_trait, FrameworkError, Seeder, StoreContext};
use sea_orm::Set;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

const BRANDS: &str = include_str!("data/brands.json");
const CATEGORIES: &str = include_str!("data/categories.json");
const PRODUCTS: &str = include_str!("data/products.json");

#[derive(Debug, Deserialize)]
struct NamedSeed {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductSeed {
    name: String,
    description: String,
    price: f64,
    picture_url: String,
    brand: String,
    category: String,
}

pub struct StoreContextSeed;

#[async_trait]
impl Seeder for StoreContextSeed {
    async fn seed(&self, store: &StoreContext) -> Result<(), FrameworkError> {
        seed_brands(store).await?;
        seed_categories(store).await?;
        seed_products(store).await
    }
}

fn parse<T: DeserializeOwned>(name: &str, raw: &str) -> Result<Vec<T>, FrameworkError> {
    serde_json::from_str(raw)
        .map_err(|e| FrameworkError::internal(format!("invalid seed file {}: {}", name, e)))
}

async fn seed_brands(store: &StoreContext) -> Result<(), FrameworkError> {
    let brands = store.set::<product_brand::Entity>();
    if brands.count().await? > 0 {
        return Ok(());
    }

    for seed in parse::<NamedSeed>("brands.json", BRANDS)? {
        brands.add(product_brand::ActiveModel {
            name: Set(seed.name),
            ..Default::default()
        });
    }
    let written = store.save().await?;
    tracing::info!(rows = written, "seeded product brands");
    Ok(())
}

async fn seed_categories(store: &StoreContext) -> Result<(), FrameworkError> {
    let categories = store.set::<product_category::Entity>();
    if categories.count().await? > 0 {
        return Ok(());
    }

    for seed in parse::<NamedSeed>("categories.json", CATEGORIES)? {
        categories.add(product_category::ActiveModel {
            name: Set(seed.name),
            ..Default::default()
        });
    }
    let written = store.save().await?;
    tracing::info!(rows = written, "seeded product categories");
    Ok(())
}

async fn seed_products(store: &StoreContext) -> Result<(), FrameworkError> {
    let products = store.set::<product::Entity>();
    if products.count().await? > 0 {
        return Ok(());
    }

    let brand_ids: HashMap<String, i32> = store
        .set::<product_brand::Entity>()
        .get_all()
        .await?
        .into_iter()
        .map(|b| (b.name, b.id))
        .collect();
    let category_ids: HashMap<String, i32> = store
        .set::<product_category::Entity>()
        .get_all()
        .await?
        .into_iter()
        .map(|c| (c.name, c.id))
        .collect();

    for seed in parse::<ProductSeed>("products.json", PRODUCTS)? {
        let brand_id = *brand_ids.get(&seed.brand).ok_or_else(|| {
            FrameworkError::internal(format!("seed product {} has unknown brand {}", seed.name, seed.brand))
        })?;
        let category_id = *category_ids.get(&seed.category).ok_or_else(|| {
            FrameworkError::internal(format!(
                "seed product {} has unknown category {}",
                seed.name, seed.category
            ))
        })?;

        products.add(product::ActiveModel {
            name: Set(seed.name),
            description: Set(seed.description),
            picture_url: Set(seed.picture_url),
            price: Set(seed.price),
            brand_id: Set(brand_id),
            category_id: Set(category_id),
            ..Default::default()
        });
    }
    let written = store.save().await?;
    tracing::info!(rows = written, "seeded products");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::Migrator;
    use kit::testing::TestDatabase;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let db = TestDatabase::fresh::<Migrator>().await.unwrap();

        StoreContextSeed.seed(&db.store()).await.unwrap();
        StoreContextSeed.seed(&db.store()).await.unwrap();

        let store = db.store();
        assert_eq!(store.set::<product_brand::Entity>().count().await.unwrap(), 6);
        assert_eq!(store.set::<product_category::Entity>().count().await.unwrap(), 4);
        assert_eq!(store.set::<product::Entity>().count().await.unwrap(), 18);
    }

    #[tokio::test]
    async fn test_products_reference_seeded_names() {
        let db = TestDatabase::fresh::<Migrator>().await.unwrap();
        StoreContextSeed.seed(&db.store()).await.unwrap();

        let store = db.store();
        let redis = store
            .set::<product_brand::Entity>()
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .find(|b| b.name == "Redis")
            .unwrap();
        let boots = store.set::<product::Entity>().get_all().await.unwrap();
        let redis_boots: Vec<_> = boots.iter().filter(|p| p.brand_id == redis.id).collect();

        assert_eq!(redis_boots.len(), 1);
        assert_eq!(redis_boots[0].name, "Redis Red Boots");
    }
}

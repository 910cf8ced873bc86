//! Mapping profiles from entities to DTOs

use crate::catalog::ProductWithRelations;
use crate::dto::{BrandDto, CategoryDto, ProductToReturnDto};
use crate::models::{product_brand, product_category};
use kit::{MapFrom, MappingContext};

impl MapFrom<product_brand::Model> for BrandDto {
    fn map_from(brand: product_brand::Model, _ctx: &MappingContext) -> Self {
        BrandDto {
            id: brand.id,
            name: brand.name,
        }
    }
}

impl MapFrom<product_category::Model> for CategoryDto {
    fn map_from(category: product_category::Model, _ctx: &MappingContext) -> Self {
        CategoryDto {
            id: category.id,
            name: category.name,
        }
    }
}

impl MapFrom<ProductWithRelations> for ProductToReturnDto {
    fn map_from(source: ProductWithRelations, ctx: &MappingContext) -> Self {
        let ProductWithRelations {
            product,
            brand,
            category,
        } = source;

        ProductToReturnDto {
            id: product.id,
            picture_url: ctx.resolve_url(&product.picture_url),
            name: product.name,
            description: product.description,
            price: product.price,
            brand_id: product.brand_id,
            brand: brand.map(|b| b.name).unwrap_or_default(),
            category_id: product.category_id,
            category: category.map(|c| c.name).unwrap_or_default(),
        }
    }
}

pub mod product;
pub mod product_brand;
pub mod product_category;

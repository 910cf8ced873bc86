//! Product entity
//!
//! Every product belongs to exactly one brand and one category. `picture_url`
//! holds a path relative to the web root; the API base URL is added when the
//! product is mapped for output.

use kit::BaseEntity;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub picture_url: String,
    pub price: f64,
    pub brand_id: i32,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_brand::Entity",
        from = "Column::BrandId",
        to = "super::product_brand::Column::Id"
    )]
    Brand,
    #[sea_orm(
        belongs_to = "super::product_category::Entity",
        from = "Column::CategoryId",
        to = "super::product_category::Column::Id"
    )]
    Category,
}

impl Related<super::product_brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<super::product_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl BaseEntity for Entity {
    fn id_column() -> Self::Column {
        Column::Id
    }
}

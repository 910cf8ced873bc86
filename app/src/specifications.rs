//! Query specifications for the catalogue

use crate::models::product;
use crate::requests::{ProductSort, ProductSpecParams};
use kit::Specification;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::ColumnTrait;

/// Filtered, sorted and paged products
///
/// The same specification drives the page query and the total count; the
/// count ignores ordering and paging.
pub fn products_with_filters(params: &ProductSpecParams) -> Specification<product::Entity> {
    let mut spec = Specification::new();

    if let Some(brand_id) = params.brand_id {
        spec = spec.and_where(product::Column::BrandId.eq(brand_id));
    }
    if let Some(category_id) = params.category_id {
        spec = spec.and_where(product::Column::CategoryId.eq(category_id));
    }
    if let Some(term) = params.search() {
        spec = spec.and_where(
            Expr::expr(Func::lower(Expr::col((
                product::Entity,
                product::Column::Name,
            ))))
            .like(LikeExpr::new(format!("%{}%", escape_like(&term))).escape('\\')),
        );
    }

    spec = match params.sort() {
        ProductSort::Name => spec.order_by_asc(product::Column::Name),
        ProductSort::PriceAsc => spec.order_by_asc(product::Column::Price),
        ProductSort::PriceDesc => spec.order_by_desc(product::Column::Price),
    };

    spec.order_by_asc(product::Column::Id)
        .paginate(params.skip(), params.page_size())
}

/// Makes `%`, `_` and the escape character match literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("blue"), "blue");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn test_paging_follows_params() {
        let params = ProductSpecParams {
            page_index: Some(2),
            page_size: Some(4),
            ..Default::default()
        };

        let spec = products_with_filters(&params);

        assert!(spec.is_paging_enabled());
        assert_eq!(spec.skip(), Some(4));
        assert_eq!(spec.take(), Some(4));
    }
}

//! Query specifications: criteria, ordering and paging as one value
//!
//! A specification describes *which* rows a caller wants without running
//! anything; the repository turns it into a query.

use sea_orm::sea_query::IntoCondition;
use sea_orm::{Condition, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Select};

/// Criteria, ordering and optional paging for entity `E`
///
/// ```rust,ignore
/// let spec = Specification::<product::Entity>::new()
///     .and_where(product::Column::BrandId.eq(2))
///     .order_by_asc(product::Column::Price)
///     .paginate(10, 5);
/// let page = store.set::<product::Entity>().get_all_with_spec(&spec).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Specification<E: EntityTrait> {
    criteria: Condition,
    order_by: Vec<(E::Column, Order)>,
    skip: Option<u64>,
    take: Option<u64>,
}

impl<E: EntityTrait> Specification<E> {
    /// Matches every row
    pub fn new() -> Self {
        Self {
            criteria: Condition::all(),
            order_by: Vec::new(),
            skip: None,
            take: None,
        }
    }

    pub fn with_criteria<C: IntoCondition>(criteria: C) -> Self {
        Self::new().and_where(criteria)
    }

    /// Narrow the criteria; every condition must hold
    pub fn and_where<C: IntoCondition>(mut self, condition: C) -> Self {
        self.criteria = self.criteria.add(condition.into_condition());
        self
    }

    /// Add an ordering; earlier orderings take precedence
    pub fn order_by(mut self, column: E::Column, order: Order) -> Self {
        self.order_by.push((column, order));
        self
    }

    pub fn order_by_asc(self, column: E::Column) -> Self {
        self.order_by(column, Order::Asc)
    }

    pub fn order_by_desc(self, column: E::Column) -> Self {
        self.order_by(column, Order::Desc)
    }

    /// Skip `skip` rows, then return at most `take`
    pub fn paginate(mut self, skip: u64, take: u64) -> Self {
        self.skip = Some(skip);
        self.take = Some(take);
        self
    }

    pub fn is_paging_enabled(&self) -> bool {
        self.take.is_some()
    }

    pub fn skip(&self) -> Option<u64> {
        self.skip
    }

    pub fn take(&self) -> Option<u64> {
        self.take
    }

    pub(crate) fn apply_criteria(&self, select: Select<E>) -> Select<E> {
        select.filter(self.criteria.clone())
    }

    pub(crate) fn apply(&self, select: Select<E>) -> Select<E> {
        let mut select = self.apply_criteria(select);
        for (column, order) in &self.order_by {
            select = select.order_by(*column, order.clone());
        }
        if let Some(skip) = self.skip {
            select = select.offset(skip);
        }
        if let Some(take) = self.take {
            select = select.limit(take);
        }
        select
    }
}

impl<E: EntityTrait> Default for Specification<E> {
    fn default() -> Self {
        Self::new()
    }
}

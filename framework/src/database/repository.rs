//! Generic repository over any entity with an integer id

use super::context::{EntityChange, EntityState, StoreContext, Tracked};
use super::specification::Specification;
use crate::error::FrameworkError;
use sea_orm::{ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter};
use std::marker::PhantomData;

/// Entities addressed by an `i32` primary key
///
/// ```rust,ignore
/// impl BaseEntity for product::Entity {
///     fn id_column() -> Self::Column {
///         product::Column::Id
///     }
/// }
/// ```
pub trait BaseEntity: EntityTrait {
    fn id_column() -> Self::Column;
}

/// CRUD facade for one entity type over a [`StoreContext`]
///
/// Reads hit the database immediately. `add`, `update` and `remove` only
/// queue changes on the context; nothing is written until the context is
/// saved.
pub struct GenericRepository<E: BaseEntity> {
    store: StoreContext,
    _entity: PhantomData<fn() -> E>,
}

impl<E: BaseEntity> GenericRepository<E> {
    pub fn new(store: &StoreContext) -> Self {
        Self {
            store: store.clone(),
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &StoreContext {
        &self.store
    }
}

impl<E> GenericRepository<E>
where
    E: BaseEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Clone + Send + Sync + 'static,
    E::ActiveModel: Send + Sync + 'static,
{
    /// Row with the given id; `None` when it does not exist
    pub async fn get_by_id(&self, id: i32) -> Result<Option<E::Model>, FrameworkError> {
        let model = E::find()
            .filter(E::id_column().eq(id))
            .one(self.store.connection())
            .await?;
        Ok(model)
    }

    pub async fn get_all(&self) -> Result<Vec<E::Model>, FrameworkError> {
        Ok(E::find().all(self.store.connection()).await?)
    }

    /// Rows matching the specification's criteria, ordering and paging
    pub async fn get_all_with_spec(
        &self,
        spec: &Specification<E>,
    ) -> Result<Vec<E::Model>, FrameworkError> {
        Ok(spec.apply(E::find()).all(self.store.connection()).await?)
    }

    /// First row matching the specification
    pub async fn get_with_spec(
        &self,
        spec: &Specification<E>,
    ) -> Result<Option<E::Model>, FrameworkError> {
        Ok(spec.apply(E::find()).one(self.store.connection()).await?)
    }

    /// Number of rows matching the criteria; ordering and paging are ignored
    pub async fn count_with_spec(&self, spec: &Specification<E>) -> Result<u64, FrameworkError> {
        Ok(spec
            .apply_criteria(E::find())
            .count(self.store.connection())
            .await?)
    }

    pub async fn count(&self) -> Result<u64, FrameworkError> {
        Ok(E::find().count(self.store.connection()).await?)
    }

    /// Queue an insert
    pub fn add(&self, model: E::ActiveModel) -> Tracked<E::Model> {
        self.track(EntityState::Added, model)
    }

    /// Queue an update of the changed columns
    pub fn update(&self, model: E::ActiveModel) -> Tracked<E::Model> {
        self.track(EntityState::Modified, model)
    }

    /// Queue a delete
    pub fn remove(&self, model: E::Model) {
        let change = EntityChange::<E>::new(EntityState::Deleted, model.into_active_model(), None);
        self.store.track(Box::new(change));
    }

    fn track(&self, state: EntityState, model: E::ActiveModel) -> Tracked<E::Model> {
        let tracked = Tracked::new();
        let change = EntityChange::<E>::new(state, model, Some(tracked.clone()));
        self.store.track(Box::new(change));
        tracked
    }
}

impl<E: BaseEntity> Clone for GenericRepository<E> {
    fn clone(&self) -> Self {
        Self::new(&self.store)
    }
}

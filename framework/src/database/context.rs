//! Per-request persistence context (unit of work)
//!
//! Reads go straight to the pool. Writes made through a repository are queued
//! and only reach the database when [`StoreContext::save`] runs them, in
//! order, inside one transaction.

use super::connection::DbConnection;
use super::repository::{BaseEntity, GenericRepository};
use crate::error::FrameworkError;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel,
    TransactionTrait,
};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Handle to a row that will exist once the owning context is saved
///
/// Filled with the stored model (generated id included) after a successful
/// `save()`; empty before that or if the save failed.
#[derive(Clone)]
pub struct Tracked<M> {
    slot: Arc<OnceLock<M>>,
}

impl<M> Tracked<M> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Arc::new(OnceLock::new()),
        }
    }

    fn fill(&self, model: M) {
        let _ = self.slot.set(model);
    }

    pub fn get(&self) -> Option<&M> {
        self.slot.get()
    }

    pub fn is_saved(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl<M: Clone> Tracked<M> {
    /// The stored model, or an error when the context was never saved
    pub fn saved(&self) -> Result<M, FrameworkError> {
        self.get()
            .cloned()
            .ok_or_else(|| FrameworkError::internal("entity has not been saved yet"))
    }
}

impl<M: fmt::Debug> fmt::Debug for Tracked<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracked").field("model", &self.get()).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    Added,
    Modified,
    Deleted,
}

/// Fills a [`Tracked`] handle; only run once the transaction has committed
pub(crate) type WriteBack = Box<dyn FnOnce() + Send>;

#[async_trait]
pub(crate) trait PendingChange: Send {
    fn state(&self) -> EntityState;

    async fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> Result<Option<WriteBack>, DbErr>;
}

pub(crate) struct EntityChange<E: EntityTrait> {
    state: EntityState,
    model: E::ActiveModel,
    tracked: Option<Tracked<E::Model>>,
}

impl<E: EntityTrait> EntityChange<E> {
    pub(crate) fn new(
        state: EntityState,
        model: E::ActiveModel,
        tracked: Option<Tracked<E::Model>>,
    ) -> Self {
        Self {
            state,
            model,
            tracked,
        }
    }
}

#[async_trait]
impl<E> PendingChange for EntityChange<E>
where
    E: BaseEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync + 'static,
    E::ActiveModel: Send + Sync + 'static,
{
    fn state(&self) -> EntityState {
        self.state
    }

    async fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> Result<Option<WriteBack>, DbErr> {
        let EntityChange {
            state,
            model,
            tracked,
        } = *self;

        let stored = match state {
            EntityState::Added => model.insert(txn).await?,
            EntityState::Modified => model.update(txn).await?,
            EntityState::Deleted => {
                model.delete(txn).await?;
                return Ok(None);
            }
        };

        Ok(tracked.map(|tracked| Box::new(move || tracked.fill(stored)) as WriteBack))
    }
}

struct StoreInner {
    connection: DbConnection,
    pending: Mutex<Vec<Box<dyn PendingChange>>>,
}

/// The unit of work for one request
///
/// Cheap to clone; clones share the same pending queue. Build one per
/// request and never share it across concurrent requests.
///
/// ```rust,ignore
/// let store = StoreContext::new(services.connection().clone());
/// let products = store.set::<product::Entity>();
/// let created = products.add(new_product);
/// store.save().await?;
/// let product = created.saved()?;
/// ```
#[derive(Clone)]
pub struct StoreContext {
    inner: Arc<StoreInner>,
}

impl StoreContext {
    pub fn new(connection: DbConnection) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                connection,
                pending: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Repository for one entity type over this context
    pub fn set<E: BaseEntity>(&self) -> GenericRepository<E> {
        GenericRepository::new(self)
    }

    pub fn connection(&self) -> &DatabaseConnection {
        self.inner.connection.inner()
    }

    pub fn db(&self) -> &DbConnection {
        &self.inner.connection
    }

    fn queue(&self) -> MutexGuard<'_, Vec<Box<dyn PendingChange>>> {
        // A poisoned queue still holds valid changes
        self.inner
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn track(&self, change: Box<dyn PendingChange>) {
        self.queue().push(change);
    }

    pub fn pending_changes(&self) -> usize {
        self.queue().len()
    }

    /// Drop every pending change, returning how many were dropped
    pub fn discard(&self) -> usize {
        let mut queue = self.queue();
        let dropped = queue.len();
        queue.clear();
        dropped
    }

    /// Write every pending change in one transaction
    ///
    /// Returns the number of changes written. On failure the transaction is
    /// rolled back and the queue is left empty.
    pub async fn save(&self) -> Result<usize, FrameworkError> {
        let changes = std::mem::take(&mut *self.queue());
        if changes.is_empty() {
            return Ok(0);
        }

        let count = changes.len();
        let added = changes
            .iter()
            .filter(|c| c.state() == EntityState::Added)
            .count();

        let txn = self.connection().begin().await?;
        let mut write_backs = Vec::with_capacity(count);
        for change in changes {
            match change.apply(&txn).await {
                Ok(write_back) => write_backs.extend(write_back),
                Err(e) => {
                    tracing::warn!(error = %e, "save failed, rolling back");
                    txn.rollback().await?;
                    return Err(e.into());
                }
            }
        }
        txn.commit().await?;

        for write_back in write_backs {
            write_back();
        }

        tracing::debug!(changes = count, added, "saved pending changes");
        Ok(count)
    }
}

impl fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreContext")
            .field("pending_changes", &self.pending_changes())
            .finish()
    }
}

//! Collection storage behind a swappable repository trait.
//!
//! Services only ever talk to `Arc<dyn Repository<T>>`, so the in-memory
//! collections used today can be replaced with a networked database without
//! touching workflow code. Each `MemoryRepository` serialises its writers
//! with a single `RwLock`: every mutation is a read-modify-write performed
//! under the write guard, which makes it atomic with respect to other writers
//! of the same collection.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;

pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
pub type Mutation<T> = Box<dyn FnOnce(&mut T) + Send>;
pub type BulkMutation<T> = Box<dyn Fn(&mut T) + Send + Sync>;
pub type CheckedMutation<T> = Box<dyn FnOnce(&mut T) -> Result<()> + Send>;

#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<T>>;

    async fn get(&self, id: Uuid) -> Result<Option<T>>;

    /// Records matching `predicate`, in insertion order.
    async fn find_all(&self, predicate: Predicate<T>) -> Result<Vec<T>>;

    async fn insert(&self, item: T) -> Result<T>;

    /// Inserts `item` unless an existing record satisfies `conflicts`.
    /// Returns `None` when a conflicting record was found.
    async fn insert_unique(&self, item: T, conflicts: Predicate<T>) -> Result<Option<T>>;

    /// Applies `apply` to the record with `id` and returns the updated copy.
    async fn update(&self, id: Uuid, apply: Mutation<T>) -> Result<Option<T>>;

    /// Like [`Repository::update`], but `apply` may refuse the change. An
    /// error leaves the record untouched. On success returns the record as it
    /// was before and after the change, both read under the same lock.
    async fn update_checked(&self, id: Uuid, apply: CheckedMutation<T>) -> Result<Option<(T, T)>>;

    /// Applies `apply` to every record matching `predicate`; returns how many
    /// records were touched.
    async fn update_where(&self, predicate: Predicate<T>, apply: BulkMutation<T>)
        -> Result<usize>;
}

pub struct MemoryRepository<T> {
    collection: &'static str,
    items: RwLock<Vec<T>>,
}

impl<T: Record> MemoryRepository<T> {
    pub fn new(collection: &'static str) -> Self {
        Self::with_items(collection, Vec::new())
    }

    pub fn with_items(collection: &'static str, items: Vec<T>) -> Self {
        Self {
            collection,
            items: RwLock::new(items),
        }
    }
}

#[async_trait]
impl<T: Record> Repository<T> for MemoryRepository<T> {
    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.items.read().await.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id() == id).cloned())
    }

    async fn find_all(&self, predicate: Predicate<T>) -> Result<Vec<T>> {
        let items = self.items.read().await;
        Ok(items.iter().filter(|item| predicate(item)).cloned().collect())
    }

    async fn insert(&self, item: T) -> Result<T> {
        let mut items = self.items.write().await;
        items.push(item.clone());
        tracing::debug!(collection = self.collection, id = %item.id(), "record inserted");
        Ok(item)
    }

    async fn insert_unique(&self, item: T, conflicts: Predicate<T>) -> Result<Option<T>> {
        let mut items = self.items.write().await;
        if items.iter().any(|existing| conflicts(existing)) {
            return Ok(None);
        }
        items.push(item.clone());
        tracing::debug!(collection = self.collection, id = %item.id(), "record inserted");
        Ok(Some(item))
    }

    async fn update(&self, id: Uuid, apply: Mutation<T>) -> Result<Option<T>> {
        let mut items = self.items.write().await;
        let Some(item) = items.iter_mut().find(|item| item.id() == id) else {
            return Ok(None);
        };
        apply(item);
        Ok(Some(item.clone()))
    }

    async fn update_checked(&self, id: Uuid, apply: CheckedMutation<T>) -> Result<Option<(T, T)>> {
        let mut items = self.items.write().await;
        let Some(item) = items.iter_mut().find(|item| item.id() == id) else {
            return Ok(None);
        };
        let mut next = item.clone();
        apply(&mut next)?;
        let before = std::mem::replace(item, next.clone());
        Ok(Some((before, next)))
    }

    async fn update_where(
        &self,
        predicate: Predicate<T>,
        apply: BulkMutation<T>,
    ) -> Result<usize> {
        let mut items = self.items.write().await;
        let mut touched = 0;
        for item in items.iter_mut().filter(|item| predicate(item)) {
            apply(item);
            touched += 1;
        }
        Ok(touched)
    }
}

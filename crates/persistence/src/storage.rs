//! The storage contract every backend implements.
//!
//! Callers hold an `Arc<dyn Storage>` chosen once at startup and never branch
//! on the concrete backend. The one observable difference is staging:
//!
//! - [`FileStorage`](crate::FileStorage) applies `new` and `delete` to the
//!   live working set immediately; `save` only flushes it to disk.
//! - [`DbStorage`](crate::DbStorage) stages `new` and `delete` until `save`
//!   commits them in one transaction.
//!
//! Code that always follows `new`/`delete` with `save` sees the same
//! behaviour from both.

use std::collections::HashMap;

use async_trait::async_trait;
use domain::models::{Entity, EntityKind};

use crate::error::StorageResult;
use crate::StorageBackend;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Which backend this is.
    fn backend(&self) -> StorageBackend;

    /// Visible entities keyed by composite key, optionally of one kind only.
    async fn all(&self, kind: Option<EntityKind>) -> StorageResult<HashMap<String, Entity>>;

    /// The entity of `kind` with identifier `id`, or `None`.
    async fn get(&self, kind: EntityKind, id: &str) -> StorageResult<Option<Entity>>;

    /// Registers an entity for persistence. Registering the same composite
    /// key again replaces the earlier registration.
    async fn new(&self, entity: Entity) -> StorageResult<()>;

    /// Commits every pending registration, mutation and deletion.
    async fn save(&self) -> StorageResult<()>;

    /// Marks an entity and everything it owns for removal. `None` and
    /// never-persisted entities are no-ops.
    async fn delete(&self, entity: Option<&Entity>) -> StorageResult<()>;

    /// Number of visible entities; always `all(kind).len()`.
    async fn count(&self, kind: Option<EntityKind>) -> StorageResult<usize>;

    /// (Re)builds the working set from the durable medium, dropping any
    /// uncommitted work.
    async fn reload(&self) -> StorageResult<()>;

    /// Releases resources acquired by `reload`. Safe to call repeatedly.
    async fn close(&self) -> StorageResult<()>;

    /// `all` keyed by type name. Unknown names yield an empty map.
    async fn all_named(&self, type_name: &str) -> StorageResult<HashMap<String, Entity>> {
        match type_name.parse::<EntityKind>() {
            Ok(kind) => self.all(Some(kind)).await,
            Err(_) => Ok(HashMap::new()),
        }
    }

    /// `get` keyed by type name. Unknown names are not-found.
    async fn get_named(&self, type_name: &str, id: &str) -> StorageResult<Option<Entity>> {
        match type_name.parse::<EntityKind>() {
            Ok(kind) => self.get(kind, id).await,
            Err(_) => Ok(None),
        }
    }

    /// `count` keyed by type name. Unknown names count zero.
    async fn count_named(&self, type_name: &str) -> StorageResult<usize> {
        match type_name.parse::<EntityKind>() {
            Ok(kind) => self.count(Some(kind)).await,
            Err(_) => Ok(0),
        }
    }

    /// Refreshes `updated_at`, registers and commits. Returns the stored
    /// entity.
    async fn persist(&self, mut entity: Entity) -> StorageResult<Entity> {
        entity.touch();
        self.new(entity.clone()).await?;
        self.save().await?;
        Ok(entity)
    }

    /// Deletes and commits.
    async fn remove(&self, entity: &Entity) -> StorageResult<()> {
        self.delete(Some(entity)).await?;
        self.save().await
    }
}

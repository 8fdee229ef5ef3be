//! JSON-file storage backend.
//!
//! The whole working set lives in memory and is written to a single JSON
//! object `{"<Type>.<id>": {"__class__": ..., ...}}` on every `save`.
//! Registrations and deletions take effect in memory immediately; only the
//! file write waits for `save`.
//!
//! There is no cross-process isolation: one writer per file.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use domain::models::{split_key, Entity, EntityKind};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::StorageResult;
use crate::storage::Storage;
use crate::StorageBackend;

/// File-backed storage.
pub struct FileStorage {
    path: PathBuf,
    objects: RwLock<HashMap<String, Entity>>,
    /// Held from snapshot to rename so concurrent saves never share the
    /// temp file and the newest snapshot is the one left on disk.
    save_lock: Mutex<()>,
}

impl FileStorage {
    /// Creates an empty store bound to `path`. Nothing is read until
    /// [`Storage::reload`].
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            objects: RwLock::new(HashMap::new()),
            save_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

/// Keys of `root` and everything transitively owned by it.
fn cascade_keys(objects: &HashMap<String, Entity>, root: &Entity) -> HashSet<String> {
    let mut doomed = HashSet::from([root.key()]);
    let mut frontier = vec![root.clone()];

    while let Some(owner) = frontier.pop() {
        for (key, candidate) in objects {
            if !doomed.contains(key) && candidate.is_owned_by(&owner) {
                doomed.insert(key.clone());
                frontier.push(candidate.clone());
            }
        }
    }

    doomed
}

#[async_trait]
impl Storage for FileStorage {
    fn backend(&self) -> StorageBackend {
        StorageBackend::File
    }

    async fn all(&self, kind: Option<EntityKind>) -> StorageResult<HashMap<String, Entity>> {
        let objects = self.objects.read().await;
        Ok(objects
            .iter()
            .filter(|(_, entity)| kind.map_or(true, |k| entity.kind() == k))
            .map(|(key, entity)| (key.clone(), entity.clone()))
            .collect())
    }

    async fn get(&self, kind: EntityKind, id: &str) -> StorageResult<Option<Entity>> {
        let objects = self.objects.read().await;
        Ok(objects.get(&kind.key(id)).cloned())
    }

    async fn new(&self, entity: Entity) -> StorageResult<()> {
        let key = entity.key();
        debug!(key = %key, "Registering entity");
        self.objects.write().await.insert(key, entity);
        Ok(())
    }

    async fn save(&self) -> StorageResult<()> {
        let _guard = self.save_lock.lock().await;
        let bytes = {
            let objects = self.objects.read().await;
            let ordered: BTreeMap<&String, &Entity> = objects.iter().collect();
            serde_json::to_vec(&ordered)?
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write then rename so a crash never leaves a truncated file.
        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "Saved storage file");
        Ok(())
    }

    async fn delete(&self, entity: Option<&Entity>) -> StorageResult<()> {
        let Some(entity) = entity else {
            return Ok(());
        };

        let mut objects = self.objects.write().await;
        if !objects.contains_key(&entity.key()) {
            debug!(key = %entity.key(), "Delete of unknown entity ignored");
            return Ok(());
        }

        let doomed = cascade_keys(&objects, entity);
        let removed_amenities: Vec<_> = doomed
            .iter()
            .filter_map(|key| objects.remove(key))
            .filter(|removed| removed.kind() == EntityKind::Amenity)
            .map(|removed| removed.id())
            .collect();

        for amenity_id in removed_amenities {
            for other in objects.values_mut() {
                if let Entity::Place(place) = other {
                    place.unlink_amenity(amenity_id);
                }
            }
        }

        debug!(key = %entity.key(), removed = doomed.len(), "Deleted entity with cascade");
        Ok(())
    }

    async fn count(&self, kind: Option<EntityKind>) -> StorageResult<usize> {
        let objects = self.objects.read().await;
        Ok(match kind {
            Some(kind) => objects.values().filter(|e| e.kind() == kind).count(),
            None => objects.len(),
        })
    }

    async fn reload(&self) -> StorageResult<()> {
        let loaded: HashMap<String, Entity> = match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Storage file not found, starting empty");
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        let mut objects = HashMap::with_capacity(loaded.len());
        for (key, entity) in loaded {
            let matches = split_key(&key).is_some_and(|(kind, id)| {
                kind == entity.kind() && id == entity.id().to_string()
            });
            if !matches {
                warn!(key = %key, expected = %entity.key(), "Re-keying mismatched record");
            }
            objects.insert(entity.key(), entity);
        }

        info!(path = %self.path.display(), objects = objects.len(), "Storage file loaded");
        *self.objects.write().await = objects;
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        debug!(path = %self.path.display(), "File storage closed");
        Ok(())
    }
}

//! Generic optimistic collection store
//!
//! Mutations are applied to memory first and then persisted. If the write
//! fails the in-memory change is undone at the same position before the
//! error is returned, so memory never drifts from what is on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::bridge::FileBridge;
use crate::debounce::{DebouncedWriter, DEFAULT_SAVE_DEBOUNCE};
use crate::entity::Entity;
use crate::error::{StoreError, StoreResult};
use crate::snapshot;

/// Default snapshot location, relative to the bridge root
pub const DEFAULT_SNAPSHOT_PATH: &str = "rulesets.yaml";

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub snapshot_path: PathBuf,
    /// Quiet period of the debounced writer
    pub save_debounce: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            save_debounce: DEFAULT_SAVE_DEBOUNCE,
        }
    }
}

pub struct CollectionStore<E: Entity> {
    items: Mutex<Vec<E>>,
    bridge: Arc<dyn FileBridge>,
    writer: DebouncedWriter,
}

impl<E: Entity> CollectionStore<E> {
    pub fn new(bridge: Arc<dyn FileBridge>, options: StoreOptions) -> Self {
        let writer = DebouncedWriter::new(
            Arc::clone(&bridge),
            options.snapshot_path,
            options.save_debounce,
        );
        Self {
            items: Mutex::new(Vec::new()),
            bridge,
            writer,
        }
    }

    pub fn snapshot_path(&self) -> &Path {
        self.writer.path()
    }

    /// Replace the collection with the persisted snapshot.
    ///
    /// A missing, unreadable or malformed snapshot leaves the collection empty.
    pub async fn load(&self) -> usize {
        let path = self.writer.path();
        let loaded = match self.bridge.read_file(path).await {
            Ok(Some(bytes)) => snapshot::decode::<E>(&bytes).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable snapshot");
                Vec::new()
            }),
            Ok(None) => {
                debug!(path = %path.display(), "No snapshot yet");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read snapshot");
                Vec::new()
            }
        };

        let count = loaded.len();
        *self.items.lock().await = loaded;
        info!(path = %path.display(), count, "Collection loaded");
        count
    }

    /// Persist the current collection through the debounced writer
    ///
    /// The snapshot is queued while the collection lock is held, so a mutation
    /// that follows always queues a newer one.
    pub async fn save(&self) -> StoreResult<()> {
        let submission = {
            let items = self.items.lock().await;
            let bytes = snapshot::encode(items.as_slice())?;
            self.writer.enqueue(bytes.into_bytes()).await
        };
        submission.wait().await
    }

    /// Write any pending snapshot without waiting for the quiet period
    pub async fn flush(&self) -> StoreResult<()> {
        self.writer.flush().await
    }

    pub async fn add(&self, item: E) -> StoreResult<()> {
        let mut items = self.items.lock().await;
        if items.iter().any(|e| e.id() == item.id()) {
            return Err(StoreError::DuplicateId {
                id: item.id().to_string(),
            });
        }

        let id = item.id().to_string();
        items.push(item);
        if let Err(e) = self.persist(&items).await {
            items.pop();
            warn!(id = %id, error = %e, "Add rolled back");
            return Err(e);
        }

        debug!(id = %id, "Added");
        Ok(())
    }

    /// Remove by id. Returns `false` when nothing matched.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut items = self.items.lock().await;
        let Some(pos) = items.iter().position(|e| e.id() == id) else {
            return Ok(false);
        };

        let removed = items.remove(pos);
        if let Err(e) = self.persist(&items).await {
            items.insert(pos, removed);
            warn!(id = %id, error = %e, "Delete rolled back");
            return Err(e);
        }

        debug!(id = %id, "Deleted");
        Ok(true)
    }

    /// Replace by id, keeping the position. Returns `false` when nothing matched.
    ///
    /// The replacement must carry the same id.
    pub async fn edit(&self, id: &str, mut replacement: E) -> StoreResult<bool> {
        let mut items = self.items.lock().await;
        let Some(pos) = items.iter().position(|e| e.id() == id) else {
            return Ok(false);
        };

        if replacement.id() != id {
            return Err(StoreError::Validation(format!(
                "Identifier cannot change from {} to {}",
                id,
                replacement.id()
            )));
        }
        replacement.inherit_transient(&items[pos]);

        let original = std::mem::replace(&mut items[pos], replacement);
        if let Err(e) = self.persist(&items).await {
            items[pos] = original;
            warn!(id = %id, error = %e, "Edit rolled back");
            return Err(e);
        }

        debug!(id = %id, "Edited");
        Ok(true)
    }

    pub async fn get_by_id(&self, id: &str) -> Option<E> {
        self.items.lock().await.iter().find(|e| e.id() == id).cloned()
    }

    /// Copy of the collection in persisted order
    pub async fn list(&self) -> Vec<E> {
        self.items.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, Vec<E>> {
        self.items.lock().await
    }

    /// Write `items` while the caller still holds the collection lock
    pub(crate) async fn persist(&self, items: &[E]) -> StoreResult<()> {
        let bytes = snapshot::encode(items)?;
        self.writer.submit(bytes.into_bytes()).await
    }

    pub(crate) fn bridge(&self) -> &Arc<dyn FileBridge> {
        &self.bridge
    }
}

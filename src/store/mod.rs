//! # Entity Store
//!
//! In-memory copy of one remote collection plus its pending-change queue.
//!
//! A store is the only place its collection is mutated. Every mutation goes
//! through a method that also records the change:
//!
//! - [`EntityStore::insert`] and [`EntityStore::update`] queue an upsert
//! - [`EntityStore::remove`] queues a delete
//!
//! [`EntityStore::flush`] then ships the queue: one PATCH carrying the current
//! value of every pending upsert, followed by one DELETE per pending delete.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskboard_sync::remote::{LoadOptions, RemoteStore};
//! use taskboard_sync::shared::Task;
//! use taskboard_sync::store::EntityStore;
//!
//! # async fn example(remote: RemoteStore) {
//! let tasks: EntityStore<Task> = EntityStore::new("tasks");
//! tasks.load(&remote, &LoadOptions::new("load tasks")).await;
//!
//! let id = tasks.insert(Task::new("Ship it")).await;
//! tasks.update(id, |task| task.description = "today".into()).await;
//! if let Err(e) = tasks.flush(&remote, None).await {
//!     // already shown to the user; the queue is intact for a retry
//!     eprintln!("{}", e);
//! }
//! # }
//! ```

use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::AtomicBool;
use tokio::sync::{Mutex, RwLock};

use crate::offline::{generate_id, ControlGuard, FlightGuard, PendingChanges, PendingSnapshot, SaveControl};
use crate::remote::{LoadOptions, RemoteStore, SAVE_FAILED_MESSAGE};
use crate::shared::entity::{Entity, EntityId, IntoEntityId};
use crate::shared::error::{RemoteError, RemoteResult};

/// What a flush did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushReport {
    /// Nothing was pending; no requests were sent
    Clean,
    /// Another flush of this store is still running; no requests were sent
    InFlight,
    /// All requests succeeded
    Synced {
        /// Entities sent in the PATCH
        patched: usize,
        /// DELETE requests sent
        deleted: usize,
        /// Pending upserts whose entity was no longer in the collection
        orphaned: usize,
    },
}

/// One collection and its pending changes
#[derive(Debug)]
pub struct EntityStore<T: Entity> {
    path: String,
    items: RwLock<Vec<T>>,
    pending: Mutex<PendingChanges>,
    in_flight: AtomicBool,
}

impl<T: Entity> EntityStore<T> {
    /// Empty store for the collection at `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_items(path, Vec::new())
    }

    pub fn with_items(path: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            path: path.into(),
            items: RwLock::new(dedupe(items)),
            pending: Mutex::new(PendingChanges::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Replace the collection with the remote copy.
    ///
    /// On failure the local collection is left as it was and the error is
    /// returned; the user has already been told unless `options` is silent.
    pub async fn load(&self, remote: &RemoteStore, options: &LoadOptions) -> RemoteResult<usize> {
        let (data, error) = remote.load_collection::<T>(&self.path, options).await.into_parts();
        if let Some(error) = error {
            return Err(error);
        }
        let items = dedupe(data);
        let count = items.len();
        *self.items.write().await = items;
        tracing::info!("[SYNC] Loaded {} {} entries from {}", count, T::KIND, self.path);
        Ok(count)
    }

    /// Snapshot of the collection in storage order
    pub async fn all(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    pub async fn get_by_id(&self, id: EntityId) -> Option<T> {
        self.items.read().await.iter().find(|item| item.id() == Some(id)).cloned()
    }

    /// Swap in a new collection without queueing anything
    pub async fn replace(&self, items: Vec<T>) {
        *self.items.write().await = dedupe(items);
    }

    /// Add or overwrite an entity and queue it for upsert.
    ///
    /// Entities without an id get a freshly generated one.
    pub async fn insert(&self, mut entity: T) -> EntityId {
        let mut items = self.items.write().await;
        let id = match entity.id() {
            Some(id) => id,
            None => {
                let id = generate_id(items.as_slice());
                entity.set_id(id);
                id
            }
        };
        match items.iter_mut().find(|item| item.id() == Some(id)) {
            Some(slot) => *slot = entity,
            None => items.push(entity),
        }
        drop(items);

        self.pending.lock().await.queue_upsert(id);
        id
    }

    /// Mutate an entity in place and queue it for upsert. Returns false when
    /// no entity has `id`.
    pub async fn update<F>(&self, id: EntityId, f: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let mut items = self.items.write().await;
        let Some(item) = items.iter_mut().find(|item| item.id() == Some(id)) else {
            return false;
        };
        f(item);
        // keep the id stable whatever the closure did
        item.set_id(id);
        drop(items);

        self.pending.lock().await.queue_upsert(id);
        true
    }

    /// Remove an entity and queue its delete.
    ///
    /// The delete is queued even when the entity is not held locally, so a
    /// remote-only record can still be removed.
    pub async fn remove(&self, id: EntityId) -> Option<T> {
        let removed = {
            let mut items = self.items.write().await;
            items
                .iter()
                .position(|item| item.id() == Some(id))
                .map(|index| items.remove(index))
        };
        self.pending.lock().await.queue_delete(id);
        removed
    }

    /// Mark an id for upsert without touching the collection
    pub async fn queue_upsert(&self, id: impl IntoEntityId) -> bool {
        self.pending.lock().await.queue_upsert(id)
    }

    /// Mark an id for delete without touching the collection
    pub async fn queue_delete(&self, id: impl IntoEntityId) -> bool {
        self.pending.lock().await.queue_delete(id)
    }

    /// Copy of the pending sets
    pub async fn pending(&self) -> PendingChanges {
        self.pending.lock().await.clone()
    }

    pub fn is_flushing(&self) -> bool {
        self.in_flight.load(std::sync::atomic::Ordering::Acquire)
    }

    /// Send all pending changes.
    ///
    /// `control` stays disabled until the flush returns. On failure the error
    /// is logged, one generic message goes to the user, and the pending sets
    /// are left exactly as they were.
    pub async fn flush(&self, remote: &RemoteStore, control: Option<&dyn SaveControl>) -> RemoteResult<FlushReport> {
        let Some(_flight) = FlightGuard::try_acquire(&self.in_flight) else {
            tracing::debug!("[SYNC] Flush of {} already in flight", self.path);
            return Ok(FlushReport::InFlight);
        };
        let _control = ControlGuard::disable(control);

        let snapshot = self.pending.lock().await.snapshot();
        if snapshot.is_empty() {
            return Ok(FlushReport::Clean);
        }

        match self.send(remote, &snapshot).await {
            Ok(report) => {
                self.pending.lock().await.acknowledge(&snapshot);
                tracing::info!("[SYNC] Flushed {}: {:?}", self.path, report);
                Ok(report)
            }
            Err(error) => {
                tracing::error!("[SYNC] Flush of {} failed: {}", self.path, error);
                remote.policy().show_user_message(SAVE_FAILED_MESSAGE);
                Err(error)
            }
        }
    }

    async fn send(&self, remote: &RemoteStore, snapshot: &PendingSnapshot) -> RemoteResult<FlushReport> {
        let (patch, orphaned) = self.build_patch(snapshot).await?;

        if !patch.is_empty() {
            remote.patch_collection(&patch, &self.path).await?;
        }

        let mut deleted = 0;
        for id in snapshot.delete_ids() {
            remote.delete_entity(id, &self.path).await?;
            deleted += 1;
        }

        Ok(FlushReport::Synced {
            patched: patch.len(),
            deleted,
            orphaned,
        })
    }

    /// Current values of the pending upserts, looked up now rather than at
    /// queue time. Ids no longer in the collection are skipped.
    async fn build_patch(&self, snapshot: &PendingSnapshot) -> RemoteResult<(BTreeMap<EntityId, Option<Value>>, usize)> {
        let items = self.items.read().await;
        let mut patch = BTreeMap::new();
        let mut orphaned = 0;
        for id in snapshot.upsert_ids() {
            match items.iter().find(|item| item.id() == Some(id)) {
                Some(item) => {
                    let value = serde_json::to_value(item).map_err(RemoteError::from)?;
                    patch.insert(id, Some(value));
                }
                None => {
                    tracing::warn!(
                        "[SYNC] Pending upsert {} {} is not in {}; dropping it",
                        T::KIND,
                        id,
                        self.path
                    );
                    orphaned += 1;
                }
            }
        }
        Ok((patch, orphaned))
    }
}

/// Keep the first entity for each id; entities without an id are kept as is
fn dedupe<T: Entity>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let before = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter(|item| item.id().map_or(true, |id| seen.insert(id)))
        .collect();
    if kept.len() != before {
        tracing::warn!("Dropped {} duplicate {} entries", before - kept.len(), T::KIND);
    }
    kept
}

//! # Pending-Change Queue
//!
//! Tracks which entity ids changed locally since the last successful sync.
//!
//! ## Features
//!
//! - **Two disjoint sets**: an id is either pending upsert or pending delete,
//!   never both; queueing into one set evicts it from the other
//! - **Ids, not values**: the queue stores ids only, so the value sent on flush
//!   is whatever the collection holds at that moment
//! - **Snapshot acknowledgement**: a flush works from a [`PendingSnapshot`];
//!   on success only entries that were not re-queued in the meantime are
//!   dropped, on failure nothing changes
//!
//! ## Usage
//!
//! ```rust
//! use taskboard_sync::offline::PendingChanges;
//!
//! let mut pending = PendingChanges::new();
//! pending.queue_upsert(5u64);
//! pending.queue_delete(5u64);
//! assert!(pending.is_pending_delete(5));
//! assert!(!pending.is_pending_upsert(5));
//! ```

use std::collections::BTreeMap;

use crate::shared::entity::{EntityId, IntoEntityId};

/// Pending upsert and delete ids
///
/// Each entry carries the sequence number of its latest queue call, which is
/// how acknowledgement tells "sent" apart from "changed again since".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingChanges {
    upserts: BTreeMap<EntityId, u64>,
    deletes: BTreeMap<EntityId, u64>,
    next_seq: u64,
}

/// The entries a flush is about to send
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSnapshot {
    upserts: Vec<(EntityId, u64)>,
    deletes: Vec<(EntityId, u64)>,
}

impl PendingSnapshot {
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }

    pub fn upsert_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.upserts.iter().map(|(id, _)| *id)
    }

    pub fn delete_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.deletes.iter().map(|(id, _)| *id)
    }
}

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` for upsert. Returns false (and does nothing) for ids that are
    /// not positive integers.
    pub fn queue_upsert(&mut self, id: impl IntoEntityId) -> bool {
        let Some(id) = id.into_entity_id() else {
            tracing::debug!("Ignoring upsert for unrepresentable id");
            return false;
        };
        let seq = self.bump();
        self.deletes.remove(&id);
        self.upserts.insert(id, seq);
        true
    }

    /// Mark `id` for delete. Same normalization as [`Self::queue_upsert`].
    pub fn queue_delete(&mut self, id: impl IntoEntityId) -> bool {
        let Some(id) = id.into_entity_id() else {
            tracing::debug!("Ignoring delete for unrepresentable id");
            return false;
        };
        let seq = self.bump();
        self.upserts.remove(&id);
        self.deletes.insert(id, seq);
        true
    }

    pub fn is_pending_upsert(&self, id: EntityId) -> bool {
        self.upserts.contains_key(&id)
    }

    pub fn is_pending_delete(&self, id: EntityId) -> bool {
        self.deletes.contains_key(&id)
    }

    /// Pending upsert ids in ascending order
    pub fn upserts(&self) -> Vec<EntityId> {
        self.upserts.keys().copied().collect()
    }

    /// Pending delete ids in ascending order
    pub fn deletes(&self) -> Vec<EntityId> {
        self.deletes.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.upserts.len() + self.deletes.len()
    }

    /// Capture what a flush should send
    pub fn snapshot(&self) -> PendingSnapshot {
        PendingSnapshot {
            upserts: self.upserts.iter().map(|(id, seq)| (*id, *seq)).collect(),
            deletes: self.deletes.iter().map(|(id, seq)| (*id, *seq)).collect(),
        }
    }

    /// Drop the entries `snapshot` delivered, keeping any queued again since
    pub fn acknowledge(&mut self, snapshot: &PendingSnapshot) {
        for (id, seq) in &snapshot.upserts {
            if self.upserts.get(id) == Some(seq) {
                self.upserts.remove(id);
            }
        }
        for (id, seq) in &snapshot.deletes {
            if self.deletes.get(id) == Some(seq) {
                self.deletes.remove(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.upserts.clear();
        self.deletes.clear();
    }

    fn bump(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

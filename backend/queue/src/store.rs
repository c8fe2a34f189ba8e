use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use grantha_core::{ItemId, ItemStatus, ProcessingStatus};
use grantha_media::{ImageBlob, PreviewRef, PreviewRegistry};

use crate::event::QueueEvent;

const EVENT_BUFFER: usize = 256;

/// One uploaded image and its processing record.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub blob: ImageBlob,
    pub preview: PreviewRef,
    pub status: ItemStatus,
    pub added_at: DateTime<Utc>,
}

impl Item {
    pub fn filename(&self) -> &str {
        self.blob.filename()
    }

    pub fn kind(&self) -> ProcessingStatus {
        self.status.kind()
    }

    pub fn result_text(&self) -> Option<&str> {
        self.status.result_text()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.status.error_message()
    }

    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            id: self.id,
            filename: self.filename().to_string(),
            mime_type: self.blob.mime_type().to_string(),
            preview: self.preview.uri(),
            added_at: self.added_at,
            status: self.status.clone(),
        }
    }
}

/// Serializable view of an item for display and JSON output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: ItemId,
    pub filename: String,
    pub mime_type: String,
    pub preview: String,
    pub added_at: DateTime<Utc>,
    #[serde(flatten)]
    pub status: ItemStatus,
}

/// Per-status item counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub success: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.processing + self.success + self.error
    }

    /// Items in a terminal state; the numerator of batch progress.
    pub fn processed(&self) -> usize {
        self.success + self.error
    }

    fn record(&mut self, kind: ProcessingStatus) {
        match kind {
            ProcessingStatus::Pending => self.pending += 1,
            ProcessingStatus::Processing => self.processing += 1,
            ProcessingStatus::Success => self.success += 1,
            ProcessingStatus::Error => self.error += 1,
        }
    }
}

/// Immutable view of the queue at one point in time.
///
/// `order` is insertion order and never changes for an item; `items` is the
/// id -> item arena it indexes into.
#[derive(Debug, Clone, Default)]
pub struct QueueSnapshot {
    order: Vec<ItemId>,
    items: HashMap<ItemId, Item>,
}

impl QueueSnapshot {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// Items in display (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    pub fn ids_with(&self, kind: ProcessingStatus) -> Vec<ItemId> {
        self.iter().filter(|i| i.kind() == kind).map(|i| i.id).collect()
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for item in self.items.values() {
            counts.record(item.kind());
        }
        counts
    }
}

/// Outcome of a `set_status` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// No item with that id; it was cleared while in flight.
    NotFound,
    /// Not an edge of the state machine; the item is unchanged.
    Rejected { from: ProcessingStatus },
}

/// Ordered, in-memory queue of uploaded items.
///
/// Every mutation swaps in a new snapshot under a short write lock
/// (copy-on-write through `Arc::make_mut`), so readers holding an older
/// snapshot never observe a partial update, and concurrent updates to
/// different items are applied one after the other by id.
pub struct QueueStore {
    snapshot: RwLock<Arc<QueueSnapshot>>,
    previews: PreviewRegistry,
    events: broadcast::Sender<QueueEvent>,
}

impl QueueStore {
    pub fn new(previews: PreviewRegistry) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            snapshot: RwLock::new(Arc::new(QueueSnapshot::default())),
            previews,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.events.subscribe()
    }

    /// Current snapshot. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<QueueSnapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// All items, in display order.
    pub fn items(&self) -> Vec<Item> {
        self.snapshot().iter().cloned().collect()
    }

    pub fn get(&self, id: &ItemId) -> Option<Item> {
        self.snapshot().get(id).cloned()
    }

    pub fn counts(&self) -> StatusCounts {
        self.snapshot().counts()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Append new `Pending` items after the existing ones, in input order.
    pub fn add_items<I>(&self, blobs: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = ImageBlob>,
    {
        let new_items: Vec<Item> = blobs
            .into_iter()
            .map(|blob| Item {
                id: ItemId::new(),
                preview: self.previews.create(&blob),
                blob,
                status: ItemStatus::Pending,
                added_at: Utc::now(),
            })
            .collect();
        if new_items.is_empty() {
            return Vec::new();
        }

        let ids: Vec<ItemId> = new_items.iter().map(|i| i.id).collect();
        self.update(|queue| {
            for item in new_items {
                queue.order.push(item.id);
                queue.items.insert(item.id, item);
            }
        });

        info!(added = ids.len(), "Items queued");
        let _ = self.events.send(QueueEvent::ItemsAdded { ids: ids.clone() });
        ids
    }

    /// Move exactly the item with `id` to `status`.
    ///
    /// Unknown ids are a silent no-op: a result may arrive after the item was
    /// cleared. Transitions outside `Pending -> Processing -> terminal` are
    /// refused and leave the item untouched.
    pub fn set_status(&self, id: ItemId, status: ItemStatus) -> Transition {
        let outcome = self.update(|queue| {
            let Some(item) = queue.items.get_mut(&id) else {
                return Transition::NotFound;
            };
            if !item.status.can_transition_to(&status) {
                return Transition::Rejected { from: item.kind() };
            }
            item.status = status.clone();
            Transition::Applied
        });

        match outcome {
            Transition::Applied => {
                debug!(item_id = %id, status = %status.kind(), "Status updated");
                let _ = self.events.send(QueueEvent::StatusChanged { id, status });
            }
            Transition::NotFound => {
                debug!(item_id = %id, "Dropping update for item no longer in queue");
            }
            Transition::Rejected { from } => {
                warn!(item_id = %id, from = %from, to = %status.kind(), "Illegal status transition");
            }
        }
        outcome
    }

    /// Atomically move every `Pending` item to `Processing` and return them in
    /// display order. Items added afterwards are not included.
    pub fn claim_pending(&self) -> Vec<Item> {
        let claimed = self.update(|queue| {
            let pending = queue.ids_with(ProcessingStatus::Pending);
            let mut claimed = Vec::with_capacity(pending.len());
            for id in pending {
                if let Some(item) = queue.items.get_mut(&id) {
                    item.status = ItemStatus::Processing;
                    claimed.push(item.clone());
                }
            }
            claimed
        });

        for item in &claimed {
            let _ = self.events.send(QueueEvent::StatusChanged {
                id: item.id,
                status: ItemStatus::Processing,
            });
        }
        claimed
    }

    /// Release every preview, then empty the queue. Returns how many items
    /// were removed.
    pub fn clear_all(&self) -> usize {
        let removed = {
            let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
            for item in guard.iter() {
                self.previews.release(&item.preview);
            }
            let removed = guard.len();
            *guard = Arc::new(QueueSnapshot::default());
            removed
        };

        info!(removed, "Queue cleared");
        let _ = self.events.send(QueueEvent::Cleared { removed });
        removed
    }

    fn update<R>(&self, f: impl FnOnce(&mut QueueSnapshot) -> R) -> R {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        f(Arc::make_mut(&mut *guard))
    }
}

impl Default for QueueStore {
    fn default() -> Self {
        Self::new(PreviewRegistry::new())
    }
}

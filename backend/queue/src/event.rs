use serde::Serialize;

use grantha_core::{ItemId, ItemStatus};

/// Change notifications published by the queue store.
///
/// Observers rebuild their view from `QueueStore::snapshot()`; events only say
/// what changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueueEvent {
    /// New items appended, in display order.
    ItemsAdded { ids: Vec<ItemId> },
    /// One item moved to a new status.
    StatusChanged { id: ItemId, status: ItemStatus },
    /// The queue was emptied.
    Cleared { removed: usize },
}

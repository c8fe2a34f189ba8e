//! Batch orchestrator: claims every pending item and runs each one through
//! encode + recognize concurrently, writing each outcome back to the store.
//!
//! Each item's pipeline is independent. A failure, timeout or panic in one
//! item becomes that item's `Error` state and never touches the others.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use grantha_core::{GranthaError, ItemId, ItemStatus, ProcessingStatus, Recognizer, Result};
use grantha_media::encode;

use crate::store::{Item, QueueStore};

const DEFAULT_MAX_CONCURRENCY: usize = 8;
const DEFAULT_ITEM_TIMEOUT: Duration = Duration::from_secs(120);

/// Shown for an item whose pipeline died without a classified error.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred while processing the image.";

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound on items encoding/recognizing at the same time.
    pub max_concurrency: usize,
    /// Deadline for one item's encode + recognize, once it has a slot.
    /// `None` waits forever.
    pub item_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            item_timeout: Some(DEFAULT_ITEM_TIMEOUT),
        }
    }
}

/// Summary of a finished batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub dispatched: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed_ms: u64,
}

/// Result of asking for a new batch.
pub enum BatchStart {
    /// Nothing was pending; nothing changed.
    Idle,
    /// Another batch from this orchestrator is still running.
    Busy,
    Started(BatchRun),
}

/// Result of `Orchestrator::process_batch`.
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    Idle,
    Busy,
    Completed(BatchReport),
}

/// Handle to a running batch.
///
/// Dropping the handle does not cancel anything; the batch runs to completion
/// and the orchestrator stays busy until it does.
pub struct BatchRun {
    batch_id: Uuid,
    item_ids: Vec<ItemId>,
    store: Arc<QueueStore>,
    handle: JoinHandle<BatchReport>,
}

impl BatchRun {
    pub fn id(&self) -> Uuid {
        self.batch_id
    }

    /// Items dispatched in this batch, in display order.
    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    /// Wait until every dispatched item is terminal.
    pub async fn wait(mut self) -> BatchReport {
        match (&mut self.handle).await {
            Ok(report) => report,
            Err(e) => {
                error!(batch_id = %self.batch_id, error = %e, "Batch driver task failed");
                self.fail_unsettled()
            }
        }
    }

    /// Move every item of this batch still in flight to `Error`.
    fn fail_unsettled(&self) -> BatchReport {
        let mut succeeded = 0;
        for id in &self.item_ids {
            match self.store.get(id).map(|item| item.kind()) {
                Some(ProcessingStatus::Processing) => {
                    self.store
                        .set_status(*id, ItemStatus::Error(UNEXPECTED_ERROR.to_string()));
                }
                Some(ProcessingStatus::Success) => succeeded += 1,
                _ => {}
            }
        }
        BatchReport {
            batch_id: self.batch_id,
            dispatched: self.item_ids.len(),
            succeeded,
            failed: self.item_ids.len() - succeeded,
            elapsed_ms: 0,
        }
    }
}

/// Clears the busy flag when the batch driver finishes, panics included.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Everything an item pipeline needs, shared across its tasks.
struct Pipeline {
    store: Arc<QueueStore>,
    recognizer: Arc<dyn Recognizer>,
    slots: Arc<Semaphore>,
    item_timeout: Option<Duration>,
}

pub struct Orchestrator {
    pipeline: Arc<Pipeline>,
    busy: Arc<AtomicBool>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<QueueStore>,
        recognizer: Arc<dyn Recognizer>,
        config: OrchestratorConfig,
    ) -> Self {
        let permits = config.max_concurrency.max(1);
        Self {
            pipeline: Arc::new(Pipeline {
                store,
                recognizer,
                slots: Arc::new(Semaphore::new(permits)),
                item_timeout: config.item_timeout,
            }),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a batch is running. UIs use this to disable "process" and
    /// "clear all" while it is `true`.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Start a batch over every item that is `Pending` right now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn begin(&self) -> BatchStart {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Batch already running; ignoring request");
            return BatchStart::Busy;
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let items = self.pipeline.store.claim_pending();
        if items.is_empty() {
            debug!("No pending items; nothing to process");
            return BatchStart::Idle;
        }

        let batch_id = Uuid::new_v4();
        let item_ids: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        info!(
            batch_id = %batch_id,
            items = items.len(),
            recognizer = %self.pipeline.recognizer.name(),
            "Starting batch"
        );

        let pipeline = Arc::clone(&self.pipeline);
        let handle = tokio::spawn(async move {
            let _guard = guard;
            run_batch(batch_id, pipeline, items).await
        });

        BatchStart::Started(BatchRun {
            batch_id,
            item_ids,
            store: Arc::clone(&self.pipeline.store),
            handle,
        })
    }

    /// Start a batch and wait for it.
    pub async fn process_batch(&self) -> BatchOutcome {
        match self.begin() {
            BatchStart::Idle => BatchOutcome::Idle,
            BatchStart::Busy => BatchOutcome::Busy,
            BatchStart::Started(run) => BatchOutcome::Completed(run.wait().await),
        }
    }
}

async fn run_batch(batch_id: Uuid, pipeline: Arc<Pipeline>, items: Vec<Item>) -> BatchReport {
    let start = Instant::now();
    let dispatched = items.len();

    let tasks: Vec<(ItemId, JoinHandle<bool>)> = items
        .into_iter()
        .map(|item| {
            let id = item.id;
            (id, tokio::spawn(process_item(Arc::clone(&pipeline), item)))
        })
        .collect();

    let outcomes = join_all(tasks.into_iter().map(|(id, task)| async move { (id, task.await) })).await;

    let mut succeeded = 0;
    let mut failed = 0;
    for (id, outcome) in outcomes {
        match outcome {
            Ok(true) => succeeded += 1,
            Ok(false) => failed += 1,
            Err(e) => {
                error!(item_id = %id, error = %e, "Item task panicked");
                pipeline
                    .store
                    .set_status(id, ItemStatus::Error(UNEXPECTED_ERROR.to_string()));
                failed += 1;
            }
        }
    }

    let report = BatchReport {
        batch_id,
        dispatched,
        succeeded,
        failed,
        elapsed_ms: start.elapsed().as_millis() as u64,
    };
    if failed > 0 {
        warn!(
            batch_id = %batch_id,
            failed,
            total = dispatched,
            "Batch completed with failures"
        );
    } else {
        info!(batch_id = %batch_id, total = dispatched, elapsed_ms = report.elapsed_ms, "Batch completed");
    }
    report
}

/// Run one item to a terminal state. Returns whether it succeeded.
async fn process_item(pipeline: Arc<Pipeline>, item: Item) -> bool {
    // The semaphore is never closed, so acquiring only waits.
    let _permit = match Arc::clone(&pipeline.slots).acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            pipeline
                .store
                .set_status(item.id, ItemStatus::Error(e.to_string()));
            return false;
        }
    };
    debug!(item_id = %item.id, filename = %item.filename(), "Recognizing item");

    let work = recognize_item(&pipeline, &item);
    let result = match pipeline.item_timeout {
        Some(limit) => tokio::time::timeout(limit, work)
            .await
            .unwrap_or_else(|_| Err(GranthaError::Timeout(limit))),
        None => work.await,
    };

    match result {
        Ok(text) => {
            info!(item_id = %item.id, filename = %item.filename(), "Item recognized");
            pipeline.store.set_status(item.id, ItemStatus::Success(text));
            true
        }
        Err(e) => {
            warn!(item_id = %item.id, filename = %item.filename(), error = %e, "Item failed");
            pipeline
                .store
                .set_status(item.id, ItemStatus::Error(e.to_string()));
            false
        }
    }
}

async fn recognize_item(pipeline: &Pipeline, item: &Item) -> Result<String> {
    let encoded = encode(&item.blob).await?;
    pipeline.recognizer.recognize(&encoded).await
}

//! The client-side batch pipeline: an ordered queue of uploaded images and an
//! orchestrator that runs every pending item through encode + recognize.

pub mod event;
pub mod orchestrator;
pub mod store;

pub use event::QueueEvent;
pub use orchestrator::{
    BatchOutcome, BatchReport, BatchRun, BatchStart, Orchestrator, OrchestratorConfig,
};
pub use store::{Item, ItemSummary, QueueSnapshot, QueueStore, StatusCounts, Transition};

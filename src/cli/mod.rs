//! Command-line facing workflow orchestration

pub mod orchestration;

pub use orchestration::{run_sync, SyncOptions, SyncOrchestrator, SyncPlan, SyncReport};

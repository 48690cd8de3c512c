//! Remote synchronization
//!
//! Periodically reconciles the local quote collection against a remote
//! source:
//!
//! 1. Fetch a snapshot of remote records
//! 2. Merge it into the local sequence (local-wins)
//! 3. Persist the merged result
//!
//! A fetch or persist failure aborts the cycle without touching local
//! state; the next cycle retries from scratch.

mod fetcher;
mod task;

pub use fetcher::{FetchError, RemoteFetcher};
pub use task::{
    spawn_sync_task, sync_once, CycleError, CycleOutcome, SyncCommand, SyncEvent, SyncHandle,
    SyncPhase,
};

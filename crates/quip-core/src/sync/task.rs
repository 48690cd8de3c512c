//! Sync orchestration
//!
//! Drives the fetch -> merge -> persist cycle on a fixed interval and at
//! startup. A single task owns the cadence; cycles run inline in its
//! loop, so no two cycles ever overlap, and timer ticks that land while
//! a cycle is in flight are skipped rather than queued.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::merge::merge;
use crate::store::QuoteStore;

use super::fetcher::{FetchError, RemoteFetcher};

/// Phase of the sync cycle state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No cycle in flight
    Idle,
    /// Retrieving the remote snapshot
    Fetching,
    /// Combining the snapshot with local state
    Merging,
    /// Writing the merged sequence to the durable store
    Persisting,
}

/// Commands sent to the sync task
#[derive(Debug, Clone)]
pub enum SyncCommand {
    /// Run a cycle now, outside the timer cadence
    Trigger,
    /// Shutdown the sync task, cancelling the pending schedule
    Shutdown,
}

/// Events emitted by the sync task
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A cycle completed and the merged sequence was persisted
    Completed(CycleOutcome),
    /// The remote snapshot could not be retrieved; no state changed
    FetchFailed(String),
    /// The merged result could not be persisted; prior state intact
    PersistFailed(String),
}

/// Result of a completed sync cycle
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// Remote quotes adopted into the local sequence
    pub adopted: usize,
    /// Total quotes after the cycle
    pub total: usize,
    /// When the cycle finished
    pub completed_at: DateTime<Utc>,
}

/// Errors that abort a sync cycle
///
/// Either way local state and the persisted files are left exactly as
/// they were; the next cycle refetches and retries.
#[derive(Error, Debug)]
pub enum CycleError {
    /// Remote retrieval failed
    #[error("Sync cycle aborted: {0}")]
    Fetch(#[from] FetchError),

    /// Durable write rejected; merged result discarded for this cycle
    #[error("Failed to persist merged quotes: {0}")]
    Persist(#[source] anyhow::Error),
}

/// Handle to control the sync task
pub struct SyncHandle {
    /// Send commands to the sync task
    pub command_tx: mpsc::Sender<SyncCommand>,
    /// Receive cycle outcomes from the sync task
    pub event_rx: mpsc::Receiver<SyncEvent>,
    /// Watch the current phase
    pub phase_rx: watch::Receiver<SyncPhase>,
}

/// Spawn the sync task
///
/// Runs an initial cycle immediately, then one per `period`. Returns a
/// handle to trigger cycles, observe phases, and shut the task down.
pub fn spawn_sync_task(
    period: Duration,
    fetcher: RemoteFetcher,
    store: Arc<Mutex<QuoteStore>>,
) -> SyncHandle {
    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(64);
    let (phase_tx, phase_rx) = watch::channel(SyncPhase::Idle);

    tokio::spawn(sync_task_loop(
        period, fetcher, store, command_rx, event_tx, phase_tx,
    ));

    SyncHandle {
        command_tx,
        event_rx,
        phase_rx,
    }
}

/// Run one fetch -> merge -> persist cycle outside the timer cadence
pub async fn sync_once(
    fetcher: &RemoteFetcher,
    store: &Mutex<QuoteStore>,
) -> Result<CycleOutcome, CycleError> {
    let (phase_tx, _phase_rx) = watch::channel(SyncPhase::Idle);
    run_cycle(fetcher, store, &phase_tx).await
}

/// Main sync task loop
async fn sync_task_loop(
    period: Duration,
    fetcher: RemoteFetcher,
    store: Arc<Mutex<QuoteStore>>,
    mut command_rx: mpsc::Receiver<SyncCommand>,
    event_tx: mpsc::Sender<SyncEvent>,
    phase_tx: watch::Sender<SyncPhase>,
) {
    info!(
        "Sync task started: polling {} every {:?}",
        fetcher.url(),
        period
    );

    // First tick completes immediately (the startup cycle); ticks that
    // land while a cycle is running are skipped, not queued.
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                report(&event_tx, run_cycle(&fetcher, &store, &phase_tx).await).await;
            }
            cmd = command_rx.recv() => {
                match cmd {
                    Some(SyncCommand::Trigger) => {
                        report(&event_tx, run_cycle(&fetcher, &store, &phase_tx).await).await;
                    }
                    Some(SyncCommand::Shutdown) | None => break,
                }
            }
        }
    }

    let _ = phase_tx.send(SyncPhase::Idle);
    info!("Sync task stopped");
}

/// Translate a cycle result into an event
async fn report(event_tx: &mpsc::Sender<SyncEvent>, result: Result<CycleOutcome, CycleError>) {
    let event = match result {
        Ok(outcome) => SyncEvent::Completed(outcome),
        Err(CycleError::Fetch(e)) => SyncEvent::FetchFailed(e.to_string()),
        Err(CycleError::Persist(e)) => SyncEvent::PersistFailed(e.to_string()),
    };
    let _ = event_tx.send(event).await;
}

/// Execute one sync cycle
///
/// Local state is read once, when the merge runs, and written once, when
/// the merged sequence is applied. An error on either side of that
/// window leaves the store and the persisted files untouched.
async fn run_cycle(
    fetcher: &RemoteFetcher,
    store: &Mutex<QuoteStore>,
    phase_tx: &watch::Sender<SyncPhase>,
) -> Result<CycleOutcome, CycleError> {
    let _ = phase_tx.send(SyncPhase::Fetching);
    let remote = match fetcher.fetch().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Sync cycle aborted, fetch failed: {}", e);
            let _ = phase_tx.send(SyncPhase::Idle);
            return Err(e.into());
        }
    };

    let _ = phase_tx.send(SyncPhase::Merging);
    let mut guard = store.lock().await;
    let local = guard.all().to_vec();
    let merged = merge(&local, &remote);
    let adopted = merged.len() - local.len();
    debug!(
        "Merged {} remote records: {} adopted, {} local kept",
        remote.len(),
        adopted,
        local.len()
    );

    let _ = phase_tx.send(SyncPhase::Persisting);
    if let Err(e) = guard.replace(merged) {
        warn!("Sync cycle aborted, persist failed: {}", e);
        let _ = phase_tx.send(SyncPhase::Idle);
        return Err(CycleError::Persist(e));
    }
    let total = guard.quote_count();
    drop(guard);

    let _ = phase_tx.send(SyncPhase::Idle);
    let outcome = CycleOutcome {
        adopted,
        total,
        completed_at: Utc::now(),
    };
    info!(
        "Sync cycle complete: {} adopted, {} total",
        outcome.adopted, outcome.total
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            server_url: None,
            sync_enabled: false,
            sync_interval_secs: 60,
        }
    }

    fn unreachable_fetcher() -> RemoteFetcher {
        // Nothing listens on port 9; connections are refused immediately.
        RemoteFetcher::new("http://127.0.0.1:9/posts").unwrap()
    }

    #[test]
    fn test_sync_phase_eq() {
        assert_eq!(SyncPhase::Idle, SyncPhase::Idle);
        assert_ne!(SyncPhase::Fetching, SyncPhase::Persisting);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_state_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let mut store = QuoteStore::open_with_config(config.clone()).unwrap();
        store.append("Local wisdom", "Stoic").unwrap();
        let persisted_before = std::fs::read(config.quotes_path()).unwrap();

        let store = Mutex::new(store);
        let err = sync_once(&unreachable_fetcher(), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, CycleError::Fetch(_)));

        // In-memory and persisted state byte-identical to pre-cycle
        let guard = store.lock().await;
        assert_eq!(guard.quote_count(), 1);
        assert_eq!(guard.all()[0].text, "Local wisdom");
        let persisted_after = std::fs::read(config.quotes_path()).unwrap();
        assert_eq!(persisted_before, persisted_after);
    }

    #[tokio::test]
    async fn test_spawn_runs_startup_cycle_and_shuts_down() {
        let temp_dir = TempDir::new().unwrap();
        let store = QuoteStore::open_with_config(test_config(&temp_dir)).unwrap();
        let store = Arc::new(Mutex::new(store));

        let mut handle = spawn_sync_task(
            Duration::from_secs(3600),
            unreachable_fetcher(),
            Arc::clone(&store),
        );

        // The startup cycle runs immediately and fails against the
        // unreachable source.
        let event = handle.event_rx.recv().await.unwrap();
        assert!(matches!(event, SyncEvent::FetchFailed(_)));

        handle.command_tx.send(SyncCommand::Shutdown).await.unwrap();
        // Task drops its event sender on exit
        assert!(handle.event_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_trigger_runs_extra_cycle() {
        let temp_dir = TempDir::new().unwrap();
        let store = QuoteStore::open_with_config(test_config(&temp_dir)).unwrap();
        let store = Arc::new(Mutex::new(store));

        let mut handle = spawn_sync_task(
            Duration::from_secs(3600),
            unreachable_fetcher(),
            Arc::clone(&store),
        );

        // Startup cycle
        assert!(matches!(
            handle.event_rx.recv().await.unwrap(),
            SyncEvent::FetchFailed(_)
        ));

        // Explicit trigger
        handle.command_tx.send(SyncCommand::Trigger).await.unwrap();
        assert!(matches!(
            handle.event_rx.recv().await.unwrap(),
            SyncEvent::FetchFailed(_)
        ));

        handle.command_tx.send(SyncCommand::Shutdown).await.unwrap();
    }
}

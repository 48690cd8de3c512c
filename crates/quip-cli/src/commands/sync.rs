//! Sync command handlers

use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::Mutex;

use quip_core::sync::{spawn_sync_task, sync_once, SyncCommand, SyncEvent};
use quip_core::{QuoteStore, RemoteFetcher};

use crate::output::Output;

/// Run one sync cycle against the remote source
pub async fn sync(store: QuoteStore, output: &Output) -> Result<()> {
    let config = store.config().clone();

    let Some(ref server_url) = config.server_url else {
        bail!(
            "Server URL not configured. Set it with:\n  \
             quip config set server_url https://your-source/posts"
        );
    };

    let fetcher = RemoteFetcher::new(server_url)?;
    output.message("Syncing with remote source...");

    let store = Mutex::new(store);
    let outcome = sync_once(&fetcher, &store).await?;

    if outcome.adopted > 0 {
        output.success(&format!(
            "Sync complete - {} new quote(s), {} total",
            outcome.adopted, outcome.total
        ));
    } else {
        output.success("Sync complete - already up to date");
    }

    Ok(())
}

/// Sync periodically until interrupted
pub async fn watch(store: QuoteStore, output: &Output) -> Result<()> {
    let config = store.config().clone();

    if !config.sync_enabled {
        bail!(
            "Sync is not enabled. Enable it with:\n  \
             quip config set sync_enabled true\n  \
             quip config set server_url https://your-source/posts"
        );
    }

    let Some(ref server_url) = config.server_url else {
        bail!(
            "Server URL not configured. Set it with:\n  \
             quip config set server_url https://your-source/posts"
        );
    };

    let fetcher = RemoteFetcher::new(server_url)?;
    let store = Arc::new(Mutex::new(store));
    let mut handle = spawn_sync_task(config.sync_interval(), fetcher, store);

    output.message(&format!(
        "Syncing {} every {}s. Press Ctrl-C to stop.",
        server_url, config.sync_interval_secs
    ));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = handle.event_rx.recv() => {
                match event {
                    Some(SyncEvent::Completed(outcome)) => {
                        if outcome.adopted > 0 {
                            output.message(&format!(
                                "[{}] {} new quote(s), {} total",
                                outcome.completed_at.format("%H:%M:%S"),
                                outcome.adopted,
                                outcome.total
                            ));
                        }
                    }
                    Some(SyncEvent::FetchFailed(reason)) => {
                        output.message(&format!("Sync skipped: {}", reason));
                    }
                    Some(SyncEvent::PersistFailed(reason)) => {
                        output.message(&format!("Sync result not persisted: {}", reason));
                    }
                    None => break,
                }
            }
        }
    }

    // Cancel the pending schedule before exit
    let _ = handle.command_tx.send(SyncCommand::Shutdown).await;
    output.message("Stopped.");

    Ok(())
}

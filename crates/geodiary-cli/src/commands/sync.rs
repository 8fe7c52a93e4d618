//! Sync command - deliver the queue, then reconcile it.

use anyhow::{Context, Result};

use geodiary_core::{SyncClient, SyncMode};
use geodiary_store::Store;

use crate::config::Config;

/// Execute the sync command.
///
/// Delivery and reconciliation are deliberately separate steps: only points
/// the server confirmed come off the queue, so a partial sequential success
/// keeps the failed points queued for the next run.
pub async fn cmd_sync(mode: SyncMode, config: &Config) -> Result<()> {
    let store = Store::open_default().context("Failed to open database")?;
    let queue = store.all()?;

    if queue.is_empty() {
        println!("No locations recorded. Run 'geodiary record' first.");
        return Ok(());
    }

    // Batch delivery may use a dedicated diary endpoint.
    let endpoint = match mode {
        SyncMode::Batch => config.resolve_diary_api_url(),
        SyncMode::Single | SyncMode::Sequential => config.resolve_api_url(),
    }
    .unwrap_or_default();

    let device_id = store.device_id()?;
    let mut client = SyncClient::new(&endpoint, config.resolve_api_key(), device_id)?;

    println!("Sending {} location(s) in {} mode...", queue.len(), mode);
    let report = client.sync(&queue, mode).await?;
    store.reconcile_after_sync(&report.outcome, &report.submitted)?;

    let submitted = report.submitted.len();
    let delivered = report.outcome.delivered_count(submitted);

    if report.outcome.is_complete() {
        match report.outcome.address() {
            Some(address) => println!(
                "Delivered {} location(s) (representative location: {}).",
                delivered, address
            ),
            None => println!("Delivered {} location(s).", delivered),
        }
    } else {
        println!(
            "Delivered {} of {} location(s); {} kept for retry.",
            delivered,
            submitted,
            submitted - delivered
        );
    }

    let remaining = store.len()?;
    if remaining > 0 {
        println!("{} location(s) still queued.", remaining);
    } else {
        println!("Queue is empty.");
    }

    Ok(())
}

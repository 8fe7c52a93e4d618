//! Delete and clear commands - queue maintenance.

use anyhow::{Context, Result};

use geodiary_store::{Error as StoreError, Store};

/// Execute the delete command.
pub fn cmd_delete(index: usize) -> Result<()> {
    let store = Store::open_default().context("Failed to open database")?;

    match store.delete_at(index) {
        Ok(()) => {
            println!("Deleted location {}. {} left.", index, store.len()?);
            Ok(())
        }
        Err(e @ StoreError::IndexOutOfRange { .. }) => {
            eprintln!(
                "Hint: indexes shift after every deletion; re-run 'geodiary list' for fresh ones."
            );
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Execute the clear command.
pub fn cmd_clear() -> Result<()> {
    let store = Store::open_default().context("Failed to open database")?;
    let len = store.len()?;
    store.clear()?;
    println!("Cleared {} queued location(s).", len);
    Ok(())
}

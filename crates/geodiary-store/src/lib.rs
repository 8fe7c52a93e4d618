//! Durable local state for the geodiary location diary.
//!
//! This crate provides the keyed, string-valued store that survives between
//! runs (the desktop analogue of the web client's `localStorage`), and on top
//! of it the two pieces of durable application state: the anonymous device
//! identity and the FIFO queue of not-yet-synced points.
//!
//! # Example
//!
//! ```no_run
//! use geodiary_store::Store;
//! use geodiary_types::Point;
//!
//! let store = Store::open_default()?;
//! let device_id = store.device_id()?;
//!
//! store.append(&Point::new(1709337000000, 35.6812, 139.7671, None)?)?;
//! assert_eq!(store.len()?, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod schema;
mod store;

pub use error::{Error, Result};
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/geodiary/data.db`
/// - macOS: `~/Library/Application Support/geodiary/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\geodiary\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("geodiary")
        .join("data.db")
}

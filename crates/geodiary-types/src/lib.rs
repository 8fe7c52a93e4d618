//! Platform-agnostic types for the geodiary location diary.
//!
//! This crate defines the data model shared by the store, capture, and sync
//! layers: the [`Point`] observation record, the per-installation
//! [`DeviceId`], the [`SyncOutcome`] returned by a sync attempt, and the
//! timestamp coercion rules applied at the ingestion boundary.
//!
//! # Example
//!
//! ```
//! use geodiary_types::Point;
//!
//! let point = Point::new(1709337000000, 35.6812, 139.7671, Some(12.0))?;
//! assert_eq!(point.latitude, 35.6812);
//! # Ok::<(), geodiary_types::ParseError>(())
//! ```

mod error;
mod outcome;
mod point;
mod timestamp;

pub use error::{ParseError, ParseResult};
pub use outcome::SyncOutcome;
pub use point::{DeviceId, Point};
pub use timestamp::{normalize_timestamp_ms, now_timestamp_ms, rfc3339_from_ms};

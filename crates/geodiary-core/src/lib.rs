//! Location capture and sync for the geodiary location diary.
//!
//! This crate turns raw sensor input into validated [`geodiary_types::Point`]
//! records and transmits the queued records to the configured remote target:
//!
//! - [`LocationSensor`] is the seam over the platform location source, with
//!   a command-backed implementation ([`CommandSensor`]) and a test double
//!   ([`MockSensor`]);
//! - [`LocationCapture`] drives one bounded-wait acquisition and classifies
//!   failures;
//! - [`SyncClient`] delivers the queue under one of three modes and reports
//!   a [`geodiary_types::SyncOutcome`] for the store to reconcile against;
//! - [`viewer_link`] derives the deep link into the external viewer.
//!
//! # Example
//!
//! ```no_run
//! use geodiary_core::{CommandSensor, LocationCapture};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sensor = CommandSensor::new("termux-location");
//! let capture = LocationCapture::new(sensor);
//! let point = capture.capture().await?;
//! println!("({}, {})", point.latitude, point.longitude);
//! # Ok(())
//! # }
//! ```

mod capture;
mod error;
mod mock;
mod sensor;
mod sync;
mod viewer;

pub use capture::{CAPTURE_TIMEOUT, LocationCapture};
pub use error::{CaptureError, SyncError};
pub use mock::MockSensor;
pub use sensor::{CommandSensor, LocationSensor, SensorFix};
pub use sync::{SyncClient, SyncMode, SyncReport};
pub use viewer::viewer_link;

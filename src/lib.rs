//! Gaze Recorder - background eye-tracker acquisition into a flat log.
//!
//! This library streams gaze points from an eye-tracking driver, drops
//! invalid or non-positive points, timestamps the rest and appends them to an
//! append-only log file. Acquisition runs on its own thread so the owning
//! application can start and stop tracking without blocking on the driver.
//!
//! # Log Format
//!
//! One sample per line, no header:
//!
//! ```text
//! <timestamp_ms>,<x>,<y>
//! 1718000000123.45,812.5,430.12
//! ```
//!
//! Coordinates and timestamps are rounded to two fractional digits.
//!
//! # Architecture
//!
//! ```text
//!   caller ──start/stop/is_running──▶ AcquisitionController
//!                                        │ run flag, spawn/join
//!                                        ▼
//!   Device ──gaze points──▶ SampleHandler ──lines──▶ SampleWriter ──▶ log file
//!  (driver)               (filter, round,           (mutex, append)
//!                          timestamp)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use gaze_recorder::{AcquisitionController, SimulatedDriver, TrackerConfig};
//!
//! let (driver, _feed) = SimulatedDriver::new(Duration::from_millis(10));
//! let config = TrackerConfig::new("gaze_data.csv", (2560u32, 1600u32));
//! let controller = AcquisitionController::new(config, Arc::new(driver));
//!
//! controller.start().expect("Failed to spawn acquisition thread");
//! std::thread::sleep(Duration::from_secs(5));
//! controller.stop();
//! ```

pub mod config;
pub mod controller;
pub mod device;
pub mod recorder;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, Resolution, TrackerConfig};
pub use controller::AcquisitionController;
pub use device::{
    DeviceError, DeviceFactory, DeviceSession, GazeFeed, GazeHandler, GazePointData,
    SimulatedDriver, Validity,
};
pub use recorder::{GazeSample, SampleWriter, WorkerError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

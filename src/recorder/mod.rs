//! Gaze sample recording: filtering, formatting and the append-only log.

pub mod sample;
pub mod worker;
pub mod writer;

// Re-export commonly used types
pub use sample::{GazeSample, DEFAULT_PRECISION};
pub use worker::{SampleHandler, WorkerError};
pub use writer::{create_shared_writer, SampleWriter, SharedSampleWriter};

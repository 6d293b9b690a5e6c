//! Append-only gaze log writer.

use crate::recorder::sample::GazeSample;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Serializes appends to the gaze log.
///
/// The file is opened in append-create mode for every sample, so it is
/// created on first write and never truncated. The parent directory is not
/// created; a missing directory is reported as an error.
#[derive(Debug)]
pub struct SampleWriter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SampleWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one sample as a single line.
    ///
    /// Concurrent callers in the same process never interleave partial
    /// lines. Other processes writing the same file are not coordinated.
    pub fn append(&self, sample: &GazeSample) -> std::io::Result<()> {
        let line = sample.to_line();

        // The guard protects no data, so a poisoned lock is still usable
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

/// Thread-safe shared sample writer.
pub type SharedSampleWriter = Arc<SampleWriter>;

/// Create a new shared sample writer.
pub fn create_shared_writer(path: impl Into<PathBuf>) -> SharedSampleWriter {
    Arc::new(SampleWriter::new(path))
}

//! Lifecycle of the background acquisition worker.
//!
//! The controller owns the shared run flag and at most one worker thread.
//! `start` returns as soon as the thread is spawned; `stop` clears the flag
//! and joins the thread once it has observed the request.

use crate::config::TrackerConfig;
use crate::device::DeviceFactory;
use crate::recorder::sample::DEFAULT_PRECISION;
use crate::recorder::worker::{run_acquisition, SampleHandler, WorkerError};
use crate::recorder::writer::{create_shared_writer, SharedSampleWriter};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{error, info, warn};

/// Starts, stops and reports on gaze acquisition.
///
/// All operations take `&self`, so the controller can be shared across
/// threads behind an `Arc`. `is_running` only reads the run flag and never
/// waits on `start` or `stop`.
pub struct AcquisitionController {
    config: TrackerConfig,
    factory: Arc<dyn DeviceFactory>,
    writer: SharedSampleWriter,
    running: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<Result<(), WorkerError>>>>,
}

impl AcquisitionController {
    /// Create an idle controller writing to `config.save_path`.
    pub fn new(config: TrackerConfig, factory: Arc<dyn DeviceFactory>) -> Self {
        let writer = create_shared_writer(config.save_path.clone());
        Self {
            config,
            factory,
            writer,
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    fn worker_slot(&self) -> MutexGuard<'_, Option<JoinHandle<Result<(), WorkerError>>>> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start acquisition on a background thread.
    ///
    /// Does nothing if acquisition is already running. Device failures happen
    /// on the worker thread and are not reported here; see
    /// [`is_worker_alive`](Self::is_worker_alive).
    pub fn start(&self) -> std::io::Result<()> {
        let mut slot = self.worker_slot();

        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Eye tracking already running, ignoring start");
            return Ok(());
        }

        let factory = self.factory.clone();
        let running = self.running.clone();
        let resolution = self.config.resolution;
        let handler = SampleHandler::new(self.writer.clone(), DEFAULT_PRECISION);

        let spawned = thread::Builder::new()
            .name("gaze-acquisition".to_string())
            .spawn(move || {
                let result = run_acquisition(factory.as_ref(), resolution, handler, &running);
                // The run flag stays set on failure; callers only see the
                // dead worker through is_worker_alive()
                if let Err(ref e) = result {
                    error!(error = %e, "Acquisition worker terminated");
                }
                result
            });

        match spawned {
            Ok(handle) => {
                *slot = Some(handle);
                info!(path = %self.writer.path().display(), "Eye tracking started");
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Stop acquisition and wait for the worker to exit.
    ///
    /// The worker notices the request after the driver's current wait
    /// returns, so this blocks for up to one driver tick. A driver that hangs
    /// inside its wait blocks this call indefinitely. Does nothing if
    /// acquisition was never started.
    pub fn stop(&self) {
        // Release the slot before joining so other callers never wait on it
        let Some(handle) = self.worker_slot().take() else {
            return;
        };

        self.running.store(false, Ordering::SeqCst);
        match handle.join() {
            Ok(Ok(())) => info!("Eye tracking stopped"),
            Ok(Err(e)) => error!(error = %e, "Eye tracking stopped after worker failure"),
            Err(_) => error!("Acquisition worker panicked"),
        }
    }

    /// Whether acquisition has been started and not yet stopped.
    ///
    /// This reflects the run flag only. A worker that died on a device or
    /// write error leaves it set until `stop` is called.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Whether a worker thread exists and has not exited.
    pub fn is_worker_alive(&self) -> bool {
        self.worker_slot()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Path of the gaze log.
    pub fn save_path(&self) -> &Path {
        self.writer.path()
    }
}

impl Drop for AcquisitionController {
    fn drop(&mut self) {
        self.stop();
    }
}

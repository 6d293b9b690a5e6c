//! The acquisition worker: bridges driver events to the sample writer.

use crate::config::Resolution;
use crate::device::types::GazePointData;
use crate::device::{DeviceError, DeviceFactory, GazeHandler};
use crate::recorder::sample::{now_ms, GazeSample};
use crate::recorder::writer::SharedSampleWriter;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// Gaze handler subscribed to the driver by the worker.
///
/// Holds only what the callback needs: the writer, the rounding precision
/// and (through [`GazeSample::from_event`]) the acceptance filter.
pub struct SampleHandler {
    writer: SharedSampleWriter,
    precision: usize,
}

impl SampleHandler {
    pub fn new(writer: SharedSampleWriter, precision: usize) -> Self {
        Self { writer, precision }
    }
}

impl GazeHandler for SampleHandler {
    fn on_gaze_point(&mut self, event: &GazePointData) -> std::io::Result<()> {
        match GazeSample::from_event(event, self.precision, now_ms()) {
            Some(sample) => {
                self.writer.append(&sample)?;
                debug!(
                    t = sample.timestamp_ms,
                    x = sample.x,
                    y = sample.y,
                    "Gaze sample written"
                );
            }
            None => {
                trace!(x = event.x, y = event.y, validity = ?event.validity, "Gaze point dropped");
            }
        }
        Ok(())
    }
}

/// Errors that terminate the acquisition worker.
#[derive(Debug)]
pub enum WorkerError {
    /// The driver could not open or pump a session
    Device(DeviceError),
    /// Appending to the gaze log failed
    Write(std::io::Error),
}

impl From<DeviceError> for WorkerError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::Handler(e) => WorkerError::Write(e),
            other => WorkerError::Device(other),
        }
    }
}

impl std::fmt::Display for WorkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerError::Device(e) => write!(f, "Device error: {e}"),
            WorkerError::Write(e) => write!(f, "Failed to write gaze sample: {e}"),
        }
    }
}

impl std::error::Error for WorkerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkerError::Device(e) => Some(e),
            WorkerError::Write(e) => Some(e),
        }
    }
}

/// Run one acquisition session until `running` is cleared.
///
/// The stop request is observed between driver ticks only; a driver whose
/// wait never returns keeps this loop (and anyone joining it) blocked.
pub fn run_acquisition(
    factory: &dyn DeviceFactory,
    resolution: Resolution,
    handler: SampleHandler,
    running: &AtomicBool,
) -> Result<(), WorkerError> {
    let mut session = factory.create_session()?;
    session.add_or_update_display_area(resolution.width, resolution.height);
    session.set_origin_offset(0.0, 0.0);
    session.subscribe_gaze_points(Box::new(handler));

    while running.load(Ordering::SeqCst) {
        session.wait_and_update()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::SimulatedDriver;
    use crate::recorder::sample::DEFAULT_PRECISION;
    use crate::recorder::writer::create_shared_writer;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_handler_writes_only_accepted_points() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let mut handler = SampleHandler::new(create_shared_writer(&path), DEFAULT_PRECISION);

        handler
            .on_gaze_point(&GazePointData::valid(100.123, 200.456))
            .unwrap();
        handler
            .on_gaze_point(&GazePointData::valid(-5.0, 10.0))
            .unwrap();
        handler
            .on_gaze_point(&GazePointData::invalid(50.0, 50.0))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(",100.12,200.46"));
    }

    #[test]
    fn test_handler_propagates_write_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("t.csv");
        let mut handler = SampleHandler::new(create_shared_writer(&path), DEFAULT_PRECISION);

        assert!(handler
            .on_gaze_point(&GazePointData::valid(1.0, 1.0))
            .is_err());
    }

    #[test]
    fn test_run_acquisition_configures_session_and_exits_on_stop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let (driver, feed) = SimulatedDriver::new(Duration::from_millis(2));
        let running = Arc::new(AtomicBool::new(true));

        let worker = {
            let running = running.clone();
            let handler = SampleHandler::new(create_shared_writer(&path), DEFAULT_PRECISION);
            thread::spawn(move || {
                run_acquisition(&driver, Resolution::new(1920.0, 1080.0), handler, &running)
            })
        };

        feed.push(GazePointData::valid(10.0, 20.0));
        assert!(feed.wait_for_delivered(1, Duration::from_secs(5)));
        assert_eq!(feed.display_area(), Some((1920.0, 1080.0)));

        running.store(false, Ordering::SeqCst);
        worker.join().unwrap().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with(",10.0,20.0\n"));
    }

    #[test]
    fn test_run_acquisition_fails_without_device() {
        let driver = SimulatedDriver::unavailable("no tracker");
        let handler = SampleHandler::new(create_shared_writer("unused.csv"), DEFAULT_PRECISION);
        let running = AtomicBool::new(true);

        let err = run_acquisition(&driver, Resolution::new(1.0, 1.0), handler, &running)
            .unwrap_err();
        assert!(matches!(err, WorkerError::Device(DeviceError::Unavailable(_))));
    }

    #[test]
    fn test_handler_error_maps_to_write_error() {
        let io = std::io::Error::other("disk full");
        let err = WorkerError::from(DeviceError::Handler(io));
        assert!(matches!(err, WorkerError::Write(_)));
        assert!(err.to_string().contains("disk full"));
    }
}

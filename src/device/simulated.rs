//! Simulated eye-tracking driver.
//!
//! Gaze points are pushed through a [`GazeFeed`] and delivered to subscribed
//! handlers from inside `wait_and_update`, the same way a vendor driver
//! dispatches its event queue once per tick. When nothing is pending the
//! wait blocks for at most one tick.

use crate::device::types::GazePointData;
use crate::device::{DeviceError, DeviceFactory, DeviceSession, GazeHandler};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Default driver tick.
pub const DEFAULT_TICK: Duration = Duration::from_millis(10);

/// Counters shared between the driver, its sessions and the feed.
#[derive(Debug, Default)]
struct DriverStats {
    sessions_opened: AtomicU64,
    delivered: AtomicU64,
    display_area: Mutex<Option<(f64, f64)>>,
}

/// How session creation fails on a misconfigured driver.
#[derive(Debug, Clone)]
enum OpenFailure {
    Unavailable(String),
    PermissionDenied,
}

/// A [`DeviceFactory`] backed by an in-process event feed.
pub struct SimulatedDriver {
    receiver: Receiver<GazePointData>,
    tick: Duration,
    open_failure: Option<OpenFailure>,
    stats: Arc<DriverStats>,
}

impl SimulatedDriver {
    /// Create a driver and the feed used to inject gaze points into it.
    pub fn new(tick: Duration) -> (Self, GazeFeed) {
        let (sender, receiver) = unbounded();
        let stats = Arc::new(DriverStats::default());

        let driver = Self {
            receiver,
            tick,
            open_failure: None,
            stats: stats.clone(),
        };
        (driver, GazeFeed { sender, stats })
    }

    /// A driver whose session creation always fails, as when no tracker is
    /// connected.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::failing(OpenFailure::Unavailable(reason.into()))
    }

    /// A driver that refuses access to the tracker.
    pub fn permission_denied() -> Self {
        Self::failing(OpenFailure::PermissionDenied)
    }

    fn failing(failure: OpenFailure) -> Self {
        let (mut driver, _feed) = Self::new(DEFAULT_TICK);
        driver.open_failure = Some(failure);
        driver
    }
}

impl DeviceFactory for SimulatedDriver {
    fn create_session(&self) -> Result<Box<dyn DeviceSession>, DeviceError> {
        match self.open_failure {
            Some(OpenFailure::Unavailable(ref reason)) => {
                return Err(DeviceError::Unavailable(reason.clone()));
            }
            Some(OpenFailure::PermissionDenied) => return Err(DeviceError::PermissionDenied),
            None => {}
        }

        self.stats.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SimulatedSession {
            receiver: self.receiver.clone(),
            tick: self.tick,
            handlers: Vec::new(),
            origin: (0.0, 0.0),
            stats: self.stats.clone(),
        }))
    }
}

struct SimulatedSession {
    receiver: Receiver<GazePointData>,
    tick: Duration,
    handlers: Vec<Box<dyn GazeHandler>>,
    origin: (f64, f64),
    stats: Arc<DriverStats>,
}

impl SimulatedSession {
    fn dispatch(&mut self, event: GazePointData) -> Result<(), DeviceError> {
        let shifted = GazePointData {
            x: event.x - self.origin.0,
            y: event.y - self.origin.1,
            validity: event.validity,
        };

        for handler in self.handlers.iter_mut() {
            handler
                .on_gaze_point(&shifted)
                .map_err(DeviceError::Handler)?;
        }

        self.stats.delivered.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl DeviceSession for SimulatedSession {
    fn add_or_update_display_area(&mut self, width: f64, height: f64) {
        if let Ok(mut area) = self.stats.display_area.lock() {
            *area = Some((width, height));
        }
    }

    fn set_origin_offset(&mut self, x: f64, y: f64) {
        self.origin = (x, y);
    }

    fn subscribe_gaze_points(&mut self, handler: Box<dyn GazeHandler>) {
        self.handlers.push(handler);
    }

    fn wait_and_update(&mut self) -> Result<(), DeviceError> {
        match self.receiver.recv_timeout(self.tick) {
            Ok(first) => {
                self.dispatch(first)?;
                // Drain whatever else queued up during this tick
                while let Ok(event) = self.receiver.try_recv() {
                    self.dispatch(event)?;
                }
                Ok(())
            }
            Err(RecvTimeoutError::Timeout) => Ok(()),
            Err(RecvTimeoutError::Disconnected) => {
                // Feed dropped: behave like an idle tracker
                thread::sleep(self.tick);
                Ok(())
            }
        }
    }
}

/// Injects gaze points into a [`SimulatedDriver`] and observes delivery.
#[derive(Clone)]
pub struct GazeFeed {
    sender: Sender<GazePointData>,
    stats: Arc<DriverStats>,
}

impl GazeFeed {
    /// Queue a gaze point for delivery on the next driver tick.
    pub fn push(&self, event: GazePointData) {
        // The driver holds the receiver for its whole lifetime
        let _ = self.sender.send(event);
    }

    /// Number of events dispatched to subscribers so far.
    pub fn delivered(&self) -> u64 {
        self.stats.delivered.load(Ordering::SeqCst)
    }

    /// Number of sessions the driver has opened.
    pub fn sessions_opened(&self) -> u64 {
        self.stats.sessions_opened.load(Ordering::SeqCst)
    }

    /// Display area most recently registered by a session.
    pub fn display_area(&self) -> Option<(f64, f64)> {
        self.stats.display_area.lock().ok().and_then(|area| *area)
    }

    /// Poll until at least `count` events were delivered or `timeout` passes.
    pub fn wait_for_delivered(&self, count: u64, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.delivered() < count {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Counting(Arc<AtomicUsize>);

    impl GazeHandler for Counting {
        fn on_gaze_point(&mut self, _event: &GazePointData) -> std::io::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Failing;

    impl GazeHandler for Failing {
        fn on_gaze_point(&mut self, _event: &GazePointData) -> std::io::Result<()> {
            Err(std::io::Error::other("disk full"))
        }
    }

    #[test]
    fn test_wait_and_update_dispatches_pending_events() {
        let (driver, feed) = SimulatedDriver::new(Duration::from_millis(5));
        let mut session = driver.create_session().unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        session.subscribe_gaze_points(Box::new(Counting(seen.clone())));

        feed.push(GazePointData::valid(1.0, 1.0));
        feed.push(GazePointData::invalid(2.0, 2.0));
        session.wait_and_update().unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(feed.delivered(), 2);
    }

    #[test]
    fn test_wait_and_update_times_out_when_idle() {
        let (driver, feed) = SimulatedDriver::new(Duration::from_millis(5));
        let mut session = driver.create_session().unwrap();

        let started = Instant::now();
        session.wait_and_update().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(5));
        assert_eq!(feed.delivered(), 0);
    }

    #[test]
    fn test_handler_error_surfaces() {
        let (driver, feed) = SimulatedDriver::new(Duration::from_millis(5));
        let mut session = driver.create_session().unwrap();
        session.subscribe_gaze_points(Box::new(Failing));

        feed.push(GazePointData::valid(1.0, 1.0));
        let err = session.wait_and_update().unwrap_err();
        assert!(matches!(err, DeviceError::Handler(_)));
        assert_eq!(feed.delivered(), 0);
    }

    #[test]
    fn test_display_area_is_recorded() {
        let (driver, feed) = SimulatedDriver::new(DEFAULT_TICK);
        let mut session = driver.create_session().unwrap();
        assert_eq!(feed.display_area(), None);

        session.add_or_update_display_area(1920.0, 1080.0);
        assert_eq!(feed.display_area(), Some((1920.0, 1080.0)));
        assert_eq!(feed.sessions_opened(), 1);
    }

    #[test]
    fn test_unavailable_driver() {
        let driver = SimulatedDriver::unavailable("no tracker connected");
        let err = driver.create_session().err().unwrap();
        assert!(matches!(err, DeviceError::Unavailable(_)));
    }

    #[test]
    fn test_permission_denied_driver() {
        let driver = SimulatedDriver::permission_denied();
        let err = driver.create_session().err().unwrap();
        assert!(matches!(err, DeviceError::PermissionDenied));
        assert_eq!(err.to_string(), "Eye tracker access denied");
    }
}

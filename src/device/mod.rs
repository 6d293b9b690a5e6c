//! Adapter seam for the eye-tracking device driver.
//!
//! The vendor driver is an external collaborator. Acquisition only needs a
//! small surface from it: create a session, configure the display area and
//! origin offset, subscribe to gaze points, and pump the driver with a
//! blocking "wait and update" call that dispatches pending events.
//!
//! A [`simulated`] driver is provided for tests and demos.

pub mod simulated;
pub mod types;

pub use simulated::{GazeFeed, SimulatedDriver};
pub use types::{GazePointData, Validity};

/// Receives gaze points dispatched by a device session.
///
/// Returning an error aborts the current `wait_and_update` call and is
/// surfaced as [`DeviceError::Handler`].
pub trait GazeHandler {
    fn on_gaze_point(&mut self, event: &GazePointData) -> std::io::Result<()>;
}

/// An open interaction session with the driver.
///
/// Sessions are created on the acquisition thread and never leave it, so
/// implementations need not be `Send`.
pub trait DeviceSession {
    /// Register or update the display area in physical units.
    fn add_or_update_display_area(&mut self, width: f64, height: f64);

    /// Set the coordinate origin offset.
    fn set_origin_offset(&mut self, x: f64, y: f64);

    /// Subscribe a handler to the gaze point stream.
    fn subscribe_gaze_points(&mut self, handler: Box<dyn GazeHandler>);

    /// Block for one driver tick, dispatching pending events to subscribers.
    fn wait_and_update(&mut self) -> Result<(), DeviceError>;
}

/// Creates device sessions. Shared with the acquisition thread.
pub trait DeviceFactory: Send + Sync {
    fn create_session(&self) -> Result<Box<dyn DeviceSession>, DeviceError>;
}

/// Errors reported by a device session.
#[derive(Debug)]
pub enum DeviceError {
    /// Driver missing or no tracker connected
    Unavailable(String),
    /// The OS or driver refused access to the tracker
    PermissionDenied,
    /// Any other failure reported by the driver itself
    Driver(String),
    /// A subscribed handler failed while events were dispatched
    Handler(std::io::Error),
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceError::Unavailable(e) => write!(f, "Eye tracker unavailable: {e}"),
            DeviceError::PermissionDenied => write!(f, "Eye tracker access denied"),
            DeviceError::Driver(e) => write!(f, "Driver error: {e}"),
            DeviceError::Handler(e) => write!(f, "Gaze handler failed: {e}"),
        }
    }
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeviceError::Handler(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_device_error_display() {
        let err = DeviceError::Unavailable("no tracker".to_string());
        assert_eq!(err.to_string(), "Eye tracker unavailable: no tracker");
        assert!(err.source().is_none());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing dir");
        let err = DeviceError::Handler(io);
        assert!(err.to_string().contains("missing dir"));
        assert!(err.source().is_some());
    }
}

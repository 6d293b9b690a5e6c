//! Raw gaze event types as reported by the eye-tracking driver.

use serde::{Deserialize, Serialize};

/// Driver-reported confidence for a gaze point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validity {
    /// The tracker is confident about this point
    Valid,
    /// Eyes lost, blink, or low confidence
    Invalid,
}

/// A single gaze point event from the driver.
///
/// Coordinates are in the display's physical units, relative to the origin
/// offset configured on the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazePointData {
    pub x: f64,
    pub y: f64,
    pub validity: Validity,
}

impl GazePointData {
    /// Create a valid gaze point.
    pub fn valid(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            validity: Validity::Valid,
        }
    }

    /// Create a gaze point the driver flagged as invalid.
    pub fn invalid(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            validity: Validity::Invalid,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validity == Validity::Valid
    }
}

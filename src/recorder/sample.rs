//! Accepted gaze samples and the acceptance filter.

use crate::device::types::GazePointData;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Fractional digits kept for coordinates and timestamps.
pub const DEFAULT_PRECISION: usize = 2;

/// One accepted gaze observation, ready to be written to the log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    /// Wall-clock time in milliseconds when the event was handled
    pub timestamp_ms: f64,
    pub x: f64,
    pub y: f64,
}

impl GazeSample {
    /// Build a sample from a raw driver event.
    ///
    /// Coordinates are rounded first and the acceptance filter is applied to
    /// the rounded values, so a point that rounds down to zero is dropped.
    /// Returns `None` for rejected events.
    pub fn from_event(
        event: &GazePointData,
        precision: usize,
        timestamp_ms: f64,
    ) -> Option<Self> {
        let x = round_to(event.x, precision);
        let y = round_to(event.y, precision);

        if !(event.is_valid() && is_positive(x, y)) {
            return None;
        }

        Some(Self {
            timestamp_ms: round_to(timestamp_ms, precision),
            x,
            y,
        })
    }

    /// Format as a log line: `<timestamp_ms>,<x>,<y>\n`.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{}\n",
            format_decimal(self.timestamp_ms),
            format_decimal(self.x),
            format_decimal(self.y)
        )
    }
}

/// Coordinate half of the acceptance filter: both strictly positive.
///
/// There is deliberately no upper bound against the display resolution.
pub fn is_positive(x: f64, y: f64) -> bool {
    x > 0.0 && y > 0.0
}

/// Round to a fixed number of fractional digits.
///
/// Rounds the exact binary value, so `2.675` (stored as `2.67499..`) becomes
/// `2.67` rather than drifting through a scaled multiply.
pub fn round_to(value: f64, digits: usize) -> f64 {
    format!("{value:.digits$}").parse().unwrap_or(value)
}

/// Current wall-clock time in fractional milliseconds.
pub fn now_ms() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1000.0
}

/// Shortest decimal text for a value. Integral values keep one fractional
/// digit (`100.0`) so every column always reads as a float.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

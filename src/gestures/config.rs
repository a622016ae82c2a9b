use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AccessibilityError;

/// Thresholds for turning raw sensor and touch signals into gestures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GestureConfig {
    /// Acceleration magnitude (in g) a sample must exceed to count as a shake
    pub shake_threshold: f64,

    /// Longest gap between two taps that still makes a double tap
    pub double_tap_window_ms: u64,

    /// Hold time before a press becomes a long press
    pub long_press_duration_ms: u64,

    pub shake_enabled: bool,
    pub double_tap_enabled: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            shake_threshold: 2.5,
            double_tap_window_ms: 300,
            long_press_duration_ms: 1000,
            shake_enabled: true,
            double_tap_enabled: true,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), AccessibilityError> {
        if !self.shake_threshold.is_finite() || self.shake_threshold <= 0.0 {
            return Err(AccessibilityError::InvalidGestureConfig(format!(
                "shake threshold must be positive, got {}",
                self.shake_threshold
            )));
        }
        if self.double_tap_window_ms == 0 {
            return Err(AccessibilityError::InvalidGestureConfig(
                "double tap window must be positive".into(),
            ));
        }
        if self.long_press_duration_ms == 0 {
            return Err(AccessibilityError::InvalidGestureConfig(
                "long press duration must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }

    pub fn long_press_duration(&self) -> Duration {
        Duration::from_millis(self.long_press_duration_ms)
    }
}

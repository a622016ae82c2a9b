pub mod controller;
pub mod state;

pub use controller::{AccessibilityModeController, AccessibilitySnapshot};
pub use state::AccessibilitySettings;

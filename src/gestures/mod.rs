pub mod config;
pub mod detector;

pub use config::GestureConfig;
pub use detector::{GestureEvent, GestureHandler, GestureSignalDetector, LongPressBinding};

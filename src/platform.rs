use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Haptic feedback kinds the host can play.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HapticPattern {
    /// Impact, medium strength. Double tap.
    Medium,
    /// Impact, heavy strength. Long press.
    Heavy,
    /// Notification, warning. Shake.
    Warning,
    /// Notification, success. Driver arrived.
    Success,
}

/// Services provided by the host operating system.
pub trait HostPlatform: Send + Sync {
    /// Whether the OS-level screen reader (TalkBack, VoiceOver) is running.
    fn is_screen_reader_enabled(&self) -> Result<bool>;

    /// Fire-and-forget haptic request.
    fn vibrate(&self, pattern: HapticPattern) -> Result<()>;
}

/// Platform used when no real device is attached: haptics go to the log and
/// the screen-reader state is whatever the embedder says it is.
pub struct HeadlessPlatform {
    screen_reader: AtomicBool,
}

impl HeadlessPlatform {
    pub fn new(screen_reader_enabled: bool) -> Self {
        Self {
            screen_reader: AtomicBool::new(screen_reader_enabled),
        }
    }

    pub fn set_screen_reader_enabled(&self, enabled: bool) {
        self.screen_reader.store(enabled, Ordering::SeqCst);
    }
}

impl HostPlatform for HeadlessPlatform {
    fn is_screen_reader_enabled(&self) -> Result<bool> {
        Ok(self.screen_reader.load(Ordering::SeqCst))
    }

    fn vibrate(&self, pattern: HapticPattern) -> Result<()> {
        info!("haptic feedback: {:?}", pattern);
        Ok(())
    }
}

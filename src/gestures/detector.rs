use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{
    error::AccessibilityError,
    log_debug, log_warn,
    platform::{HapticPattern, HostPlatform},
};

use super::GestureConfig;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum GestureEvent {
    Shake,
    DoubleTap,
    LongPress,
}

impl GestureEvent {
    fn haptic(self) -> HapticPattern {
        match self {
            GestureEvent::Shake => HapticPattern::Warning,
            GestureEvent::DoubleTap => HapticPattern::Medium,
            GestureEvent::LongPress => HapticPattern::Heavy,
        }
    }
}

pub type GestureHandler = Arc<dyn Fn() + Send + Sync>;

fn haptic_feedback(platform: &dyn HostPlatform, event: GestureEvent) {
    if let Err(err) = platform.vibrate(event.haptic()) {
        log_warn!("Haptic feedback for {:?} failed: {}", event, err);
    }
}

/// One-shot hold timer. Fires its callback once unless cancelled first.
struct PressTimer {
    duration: Duration,
    platform: Arc<dyn HostPlatform>,
    token: Option<CancellationToken>,
}

impl PressTimer {
    fn new(duration: Duration, platform: Arc<dyn HostPlatform>) -> Self {
        Self {
            duration,
            platform,
            token: None,
        }
    }

    fn arm<F>(&mut self, callback: F) -> Result<(), AccessibilityError>
    where
        F: FnOnce() + Send + 'static,
    {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| AccessibilityError::NoRuntime)?;
        self.cancel();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let platform = self.platform.clone();
        let duration = self.duration;

        runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(duration) => {
                    log_debug!("long press recognised");
                    haptic_feedback(platform.as_ref(), GestureEvent::LongPress);
                    callback();
                }
            }
        });

        self.token = Some(token);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}

impl Drop for PressTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Long-press handler bound to one control, mirroring a press-in/press-out
/// prop pair on a touchable.
pub struct LongPressBinding {
    timer: PressTimer,
    handler: GestureHandler,
}

impl LongPressBinding {
    pub fn press_in(&mut self) -> Result<(), AccessibilityError> {
        let handler = self.handler.clone();
        self.timer.arm(move || handler())
    }

    pub fn press_out(&mut self) {
        self.timer.cancel();
    }
}

/// Turns raw accelerometer samples and touch signals into shake, double-tap
/// and long-press gestures.
pub struct GestureSignalDetector {
    config: GestureConfig,
    platform: Arc<dyn HostPlatform>,
    last_tap: Option<Instant>,
    /// Set while the current excursion above the shake threshold has already
    /// been reported.
    shaking: bool,
    press: PressTimer,
    on_shake: Option<GestureHandler>,
    on_double_tap: Option<GestureHandler>,
}

impl GestureSignalDetector {
    pub fn new(
        config: GestureConfig,
        platform: Arc<dyn HostPlatform>,
    ) -> Result<Self, AccessibilityError> {
        config.validate()?;
        let press = PressTimer::new(config.long_press_duration(), platform.clone());
        Ok(Self {
            config,
            platform,
            last_tap: None,
            shaking: false,
            press,
            on_shake: None,
            on_double_tap: None,
        })
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn bind_shake(&mut self, handler: impl Fn() + Send + Sync + 'static) {
        self.on_shake = Some(Arc::new(handler));
    }

    pub fn bind_double_tap(&mut self, handler: impl Fn() + Send + Sync + 'static) {
        self.on_double_tap = Some(Arc::new(handler));
    }

    pub fn bind_long_press(&self, handler: impl Fn() + Send + Sync + 'static) -> LongPressBinding {
        LongPressBinding {
            timer: PressTimer::new(self.config.long_press_duration(), self.platform.clone()),
            handler: Arc::new(handler),
        }
    }

    pub fn set_shake_detection_active(&mut self, active: bool) {
        self.config.shake_enabled = active;
        self.shaking = false;
    }

    pub fn on_raw_motion_sample(&mut self, x: f64, y: f64, z: f64) -> Option<GestureEvent> {
        if !self.config.shake_enabled {
            return None;
        }

        let magnitude = (x * x + y * y + z * z).sqrt();
        if !magnitude.is_finite() {
            return None;
        }

        if magnitude <= self.config.shake_threshold {
            self.shaking = false;
            return None;
        }
        if self.shaking {
            return None;
        }

        self.shaking = true;
        log_debug!("shake recognised at {:.2}g", magnitude);
        self.emit(GestureEvent::Shake, self.on_shake.clone());
        Some(GestureEvent::Shake)
    }

    pub fn on_tap_signal(&mut self) -> Option<GestureEvent> {
        self.on_tap_signal_at(Instant::now())
    }

    pub fn on_tap_signal_at(&mut self, now: Instant) -> Option<GestureEvent> {
        if !self.config.double_tap_enabled {
            return None;
        }

        let window = self.config.double_tap_window();
        match self.last_tap {
            Some(previous) if now.saturating_duration_since(previous) < window => {
                self.last_tap = None;
                log_debug!("double tap recognised");
                self.emit(GestureEvent::DoubleTap, self.on_double_tap.clone());
                Some(GestureEvent::DoubleTap)
            }
            _ => {
                self.last_tap = Some(now);
                None
            }
        }
    }

    /// Start the long-press timer. `callback` runs once if the press is still
    /// held after the configured duration.
    pub fn on_press_start<F>(&mut self, callback: F) -> Result<(), AccessibilityError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.press.arm(callback)
    }

    pub fn on_press_end(&mut self) {
        self.press.cancel();
    }

    fn emit(&self, event: GestureEvent, handler: Option<GestureHandler>) {
        haptic_feedback(self.platform.as_ref(), event);
        if let Some(handler) = handler {
            handler();
        }
    }
}

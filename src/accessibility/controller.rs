use std::sync::Arc;

use log::{error, info, warn};
use serde::Serialize;

use crate::{
    error::AccessibilityError,
    platform::HostPlatform,
    profiles::{self, Theme, VisionProfile},
    settings::KeyValueStore,
    speech::{AnnouncementScheduler, Priority, SpeechDevice, SpeechEvent},
};

use super::AccessibilitySettings;

const READER_ON: &str = "Lector de pantalla activado";
const READER_OFF: &str = "Lector de pantalla desactivado";
const READER_LOCKED_ON: &str = "El lector de pantalla no se puede desactivar en este modo.";
const READER_UNAVAILABLE: &str = "El lector de pantalla no está disponible en este modo.";

/// Everything a screen needs to render itself for the current profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilitySnapshot {
    pub settings: AccessibilitySettings,
    pub profile: VisionProfile,
    pub theme: Theme,
    pub font_multiplier: f32,
    pub screen_reader_active: bool,
    pub can_toggle_screen_reader: bool,
    pub speaking: bool,
}

/// Owns the vision profile selection and gates every announcement on the
/// effective screen-reader state.
pub struct AccessibilityModeController<S: KeyValueStore, D: SpeechDevice> {
    store: S,
    platform: Arc<dyn HostPlatform>,
    scheduler: AnnouncementScheduler<D>,
    settings: AccessibilitySettings,
    host_screen_reader: bool,
}

impl<S: KeyValueStore, D: SpeechDevice> AccessibilityModeController<S, D> {
    pub fn initialize(
        store: S,
        platform: Arc<dyn HostPlatform>,
        scheduler: AnnouncementScheduler<D>,
    ) -> Self {
        let settings = AccessibilitySettings::load(&store);
        let host_screen_reader = platform.is_screen_reader_enabled().unwrap_or_else(|err| {
            warn!("Could not query host screen reader: {err:#}");
            false
        });

        info!(
            "Accessibility initialised: profile={}, reader_user_enabled={}, host_reader={}",
            settings.active_profile, settings.screen_reader_user_enabled, host_screen_reader
        );

        Self {
            store,
            platform,
            scheduler,
            settings,
            host_screen_reader,
        }
    }

    pub fn settings(&self) -> AccessibilitySettings {
        self.settings
    }

    pub fn active_profile(&self) -> &'static VisionProfile {
        self.settings.profile()
    }

    pub fn theme(&self) -> &'static Theme {
        self.active_profile().theme()
    }

    pub fn font_multiplier(&self) -> f32 {
        self.active_profile().font_multiplier()
    }

    pub fn can_toggle_screen_reader(&self) -> bool {
        self.active_profile().screen_reader_toggleable
    }

    pub fn host_screen_reader_enabled(&self) -> bool {
        self.host_screen_reader
    }

    pub fn scheduler(&self) -> &AnnouncementScheduler<D> {
        &self.scheduler
    }

    pub fn snapshot(&self) -> AccessibilitySnapshot {
        AccessibilitySnapshot {
            settings: self.settings,
            profile: *self.active_profile(),
            theme: *self.theme(),
            font_multiplier: self.font_multiplier(),
            screen_reader_active: self.is_screen_reader_active(),
            can_toggle_screen_reader: self.can_toggle_screen_reader(),
            speaking: self.scheduler.is_speaking(),
        }
    }

    pub fn set_profile(
        &mut self,
        profile_id: &str,
    ) -> Result<AccessibilitySettings, AccessibilityError> {
        let profile = profiles::lookup(profile_id)?;
        let was_active = self.is_screen_reader_active();

        self.settings.active_profile = profile.id;
        if profile.screen_reader_forced {
            self.settings.screen_reader_user_enabled = true;
        } else if profile.is_standard() {
            self.settings.screen_reader_user_enabled = false;
        }

        if was_active && !self.is_screen_reader_active() {
            self.scheduler.stop_all();
        }

        self.persist();
        info!("Vision profile changed to {}", profile.id);

        self.announce(
            format!("{} activado. {}", profile.display_name, profile.description),
            Priority::High,
        );

        Ok(self.settings)
    }

    /// Flip the user's screen-reader preference. Profiles without a toggle
    /// answer with a spoken rejection and keep their state.
    pub fn toggle_screen_reader(&mut self) -> AccessibilitySettings {
        let profile = self.active_profile();
        if !profile.screen_reader_toggleable {
            info!("Screen reader toggle rejected for profile {}", profile.id);
            let rejection = if profile.screen_reader_forced {
                READER_LOCKED_ON
            } else {
                READER_UNAVAILABLE
            };
            self.announce(rejection, Priority::High);
            return self.settings;
        }

        let enabled = !self.settings.screen_reader_user_enabled;
        self.settings.screen_reader_user_enabled = enabled;
        self.persist();

        if enabled {
            self.announce(READER_ON, Priority::High);
        } else if self.is_screen_reader_active() {
            self.announce(READER_OFF, Priority::High);
        } else {
            // Nothing queued survives the switch-off; the confirmation is the
            // last thing the reader says.
            self.scheduler.stop_all();
            self.scheduler.enqueue(READER_OFF, Priority::High);
        }

        self.settings
    }

    pub fn is_screen_reader_active(&self) -> bool {
        self.settings.screen_reader_enabled() || self.host_screen_reader
    }

    /// Re-read the host screen-reader state. Keeps the last known value if
    /// the query fails.
    pub fn refresh_host_screen_reader(&mut self) -> bool {
        match self.platform.is_screen_reader_enabled() {
            Ok(enabled) => {
                if enabled != self.host_screen_reader {
                    info!("Host screen reader changed: {}", enabled);
                }
                self.host_screen_reader = enabled;
            }
            Err(err) => warn!("Could not query host screen reader: {err:#}"),
        }
        self.host_screen_reader
    }

    /// Queue `text` for speech if the screen reader is active. Returns whether
    /// the announcement was forwarded.
    pub fn announce(&mut self, text: impl Into<String>, priority: Priority) -> bool {
        if !self.is_screen_reader_active() {
            return false;
        }
        self.scheduler.enqueue(text, priority);
        true
    }

    pub fn stop_speaking(&mut self) {
        self.scheduler.stop_all();
    }

    pub fn clear_queue(&mut self) {
        self.scheduler.clear_queue();
    }

    pub fn handle_speech_event(&mut self, event: SpeechEvent) {
        self.scheduler.handle_event(event);
    }

    fn persist(&self) {
        if let Err(err) = self.settings.persist(&self.store) {
            error!("Failed to persist accessibility settings, keeping them for this session: {err:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        profiles::VisionProfileId,
        settings::MemoryStore,
        testing::{BrokenStore, FakePlatform, RecordingDevice},
    };

    type Controller<S> = AccessibilityModeController<S, RecordingDevice>;

    fn controller_with<S: KeyValueStore>(
        store: S,
        platform: Arc<FakePlatform>,
    ) -> (Controller<S>, RecordingDevice) {
        let device = RecordingDevice::new();
        let scheduler = AnnouncementScheduler::new(device.clone());
        (
            AccessibilityModeController::initialize(store, platform, scheduler),
            device,
        )
    }

    fn controller() -> (Controller<Arc<MemoryStore>>, RecordingDevice) {
        controller_with(Arc::new(MemoryStore::new()), Arc::new(FakePlatform::default()))
    }

    #[test]
    fn blind_forces_reader_and_announces_mode() {
        let (mut controller, device) = controller();

        let settings = controller.set_profile("blind").unwrap();

        assert!(settings.screen_reader_user_enabled);
        assert!(controller.is_screen_reader_active());
        assert_eq!(
            device.spoken(),
            vec!["Ceguera activado. Lector de pantalla obligatorio. Navegación por voz."]
        );
        assert_eq!(
            controller.scheduler().current().unwrap().priority,
            Priority::High
        );
    }

    #[test]
    fn standard_forces_reader_off() {
        let (mut controller, _device) = controller();
        controller.set_profile("low-vision").unwrap();
        controller.toggle_screen_reader();
        assert!(controller.settings().screen_reader_user_enabled);

        let settings = controller.set_profile("standard").unwrap();

        assert!(!settings.screen_reader_user_enabled);
        assert!(!controller.is_screen_reader_active());
    }

    #[test]
    fn unknown_profile_leaves_state_alone() {
        let (mut controller, device) = controller();
        controller.set_profile("blind").unwrap();
        let before = controller.settings();

        let err = controller.set_profile("sonar").unwrap_err();

        assert_eq!(err, AccessibilityError::UnknownProfile("sonar".into()));
        assert_eq!(controller.settings(), before);
        assert_eq!(device.spoken().len(), 1);
    }

    #[test]
    fn toggle_on_blind_is_rejected_out_loud() {
        let (mut controller, device) = controller();
        controller.set_profile("blind").unwrap();
        let before = controller.settings();

        let after = controller.toggle_screen_reader();

        assert_eq!(after, before);
        assert!(controller.scheduler().pending().any(|m| m.text == READER_LOCKED_ON));
        assert!(!device.spoken().iter().any(|t| t == READER_OFF));
        assert!(!controller.scheduler().pending().any(|m| m.text == READER_OFF));
    }

    #[test]
    fn toggle_on_standard_is_rejected_silently() {
        let (mut controller, device) = controller();

        let after = controller.toggle_screen_reader();

        assert_eq!(after, AccessibilitySettings::default());
        assert!(device.spoken().is_empty());
    }

    #[test]
    fn low_vision_toggle_round_trip() {
        let (mut controller, device) = controller();
        controller.set_profile("low-vision").unwrap();
        // Reader is off by default on low vision, so the mode change is silent.
        assert!(device.spoken().is_empty());

        let on = controller.toggle_screen_reader();
        assert!(on.screen_reader_user_enabled);
        assert_eq!(device.spoken(), vec![READER_ON]);

        controller.announce("Buscando conductor disponible", Priority::Normal);
        assert_eq!(controller.scheduler().pending_len(), 1);

        let off = controller.toggle_screen_reader();
        assert!(!off.screen_reader_user_enabled);
        assert!(!controller.is_screen_reader_active());
        assert_eq!(device.spoken(), vec![READER_ON, READER_OFF]);
        assert_eq!(controller.scheduler().pending_len(), 0);

        assert!(!controller.announce("nadie escucha", Priority::High));
    }

    #[test]
    fn announce_is_gated_on_effective_state() {
        let platform = Arc::new(FakePlatform::default());
        let (mut controller, device) =
            controller_with(Arc::new(MemoryStore::new()), platform.clone());

        assert!(!controller.announce("hola", Priority::Normal));
        assert!(device.spoken().is_empty());

        *platform.screen_reader.lock().unwrap() = true;
        assert!(controller.refresh_host_screen_reader());
        assert!(controller.announce("hola", Priority::Normal));
        assert_eq!(device.spoken(), vec!["hola"]);
    }

    #[test]
    fn host_reader_does_not_change_stored_preference() {
        let (mut controller, _device) = controller_with(
            Arc::new(MemoryStore::new()),
            Arc::new(FakePlatform::with_screen_reader(true)),
        );

        assert!(controller.is_screen_reader_active());
        controller.set_profile("standard").unwrap();
        assert!(!controller.settings().screen_reader_user_enabled);
        assert!(controller.is_screen_reader_active());
    }

    #[test]
    fn failed_host_query_counts_as_disabled() {
        let platform = FakePlatform {
            fail_query: true,
            ..Default::default()
        };
        let (controller, _device) =
            controller_with(Arc::new(MemoryStore::new()), Arc::new(platform));
        assert!(!controller.host_screen_reader_enabled());
    }

    #[test]
    fn switching_to_standard_flushes_pending_speech() {
        let (mut controller, device) = controller();
        controller.set_profile("blind").unwrap();
        controller.announce("Tu conductor está a 5 minutos.", Priority::Normal);
        controller.announce("Viaje iniciado.", Priority::Low);
        assert_eq!(controller.scheduler().pending_len(), 2);

        controller.set_profile("standard").unwrap();

        assert_eq!(controller.scheduler().pending_len(), 0);
        assert!(!controller.scheduler().is_speaking());
        assert_eq!(device.stop_count(), 1);
        assert_eq!(device.spoken().len(), 1);
    }

    #[test]
    fn persistence_failure_keeps_session_state() {
        let (mut controller, _device) =
            controller_with(BrokenStore, Arc::new(FakePlatform::default()));

        let settings = controller.set_profile("blind").unwrap();

        assert_eq!(settings.active_profile, VisionProfileId::Blind);
        assert!(controller.is_screen_reader_active());
    }

    #[test]
    fn settings_survive_restart() {
        let store = Arc::new(MemoryStore::new());
        {
            let (mut controller, _device) =
                controller_with(store.clone(), Arc::new(FakePlatform::default()));
            controller.set_profile("low-vision").unwrap();
            controller.toggle_screen_reader();
        }

        let (restarted, _device) = controller_with(store, Arc::new(FakePlatform::default()));
        assert_eq!(
            restarted.settings(),
            AccessibilitySettings::new(VisionProfileId::LowVision, true)
        );
        assert_eq!(restarted.theme().colors.background, "#ffff00");
    }

    #[test]
    fn snapshot_reflects_profile() {
        let (mut controller, _device) = controller();
        controller.set_profile("blind").unwrap();

        let snapshot = controller.snapshot();
        assert!(snapshot.screen_reader_active);
        assert!(!snapshot.can_toggle_screen_reader);
        assert!(snapshot.speaking);
        assert_eq!(snapshot.profile.id, VisionProfileId::Blind);
    }
}

use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    profiles::{VisionProfile, VisionProfileId},
    settings::KeyValueStore,
};

pub const VISION_MODE_KEY: &str = "@lookism:vision_mode";
pub const SCREEN_READER_KEY: &str = "@lookism:screen_reader_enabled";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilitySettings {
    pub active_profile: VisionProfileId,
    /// Stored user preference. Read through [`Self::screen_reader_enabled`],
    /// which accounts for profiles that force the reader on.
    pub screen_reader_user_enabled: bool,
}

impl AccessibilitySettings {
    pub fn new(active_profile: VisionProfileId, screen_reader_user_enabled: bool) -> Self {
        Self {
            active_profile,
            screen_reader_user_enabled,
        }
    }

    pub fn profile(&self) -> &'static VisionProfile {
        self.active_profile.profile()
    }

    pub fn screen_reader_enabled(&self) -> bool {
        self.screen_reader_user_enabled || self.profile().screen_reader_forced
    }

    /// Read settings from `store`, falling back to defaults for anything
    /// absent, unreadable or corrupt.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let stored_profile = match store.get(VISION_MODE_KEY) {
            Ok(value) => value,
            Err(err) => {
                warn!("Failed to load vision mode, using defaults: {err:#}");
                return Self::default();
            }
        };

        let Some(raw_profile) = stored_profile else {
            return Self::default();
        };

        let active_profile = match raw_profile.parse::<VisionProfileId>() {
            Ok(id) => id,
            Err(err) => {
                warn!("Ignoring stored vision mode: {err}");
                return Self::default();
            }
        };

        let screen_reader_user_enabled = match store.get(SCREEN_READER_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(raw.trim()).unwrap_or_else(|_| {
                warn!("Ignoring corrupt screen reader flag {raw:?}");
                false
            }),
            Ok(None) => false,
            Err(err) => {
                warn!("Failed to load screen reader flag: {err:#}");
                false
            }
        };

        Self {
            active_profile,
            screen_reader_user_enabled,
        }
    }

    pub fn persist<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<()> {
        store.set(VISION_MODE_KEY, self.active_profile.as_str())?;
        store.set(
            SCREEN_READER_KEY,
            if self.screen_reader_user_enabled {
                "true"
            } else {
                "false"
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        profiles,
        settings::{JsonFileStore, MemoryStore},
        testing::BrokenStore,
    };

    #[test]
    fn first_launch_is_standard_without_reader() {
        let settings = AccessibilitySettings::load(&MemoryStore::new());
        assert_eq!(settings.active_profile, VisionProfileId::Standard);
        assert!(!settings.screen_reader_user_enabled);
        assert!(!settings.screen_reader_enabled());
    }

    #[test]
    fn round_trips_every_combination_across_restart() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("settings.json");

        for profile in profiles::all() {
            for flag in [false, true] {
                let settings = AccessibilitySettings::new(profile.id, flag);
                {
                    let store = JsonFileStore::new(path.clone()).unwrap();
                    settings.persist(&store).unwrap();
                }
                let reopened = JsonFileStore::new(path.clone()).unwrap();
                assert_eq!(AccessibilitySettings::load(&reopened), settings);
            }
        }
    }

    #[test]
    fn blind_profile_forces_reader_regardless_of_stored_flag() {
        let settings = AccessibilitySettings::new(VisionProfileId::Blind, false);
        assert!(settings.screen_reader_enabled());
    }

    #[test]
    fn corrupt_values_fall_back() {
        let store = MemoryStore::new();
        store.set(VISION_MODE_KEY, "x-ray").unwrap();
        assert_eq!(AccessibilitySettings::load(&store), AccessibilitySettings::default());

        store.set(VISION_MODE_KEY, "low").unwrap();
        store.set(SCREEN_READER_KEY, "maybe").unwrap();
        assert_eq!(
            AccessibilitySettings::load(&store),
            AccessibilitySettings::new(VisionProfileId::LowVision, false)
        );
    }

    #[test]
    fn unreadable_store_falls_back() {
        assert_eq!(
            AccessibilitySettings::load(&BrokenStore),
            AccessibilitySettings::default()
        );
        assert!(AccessibilitySettings::default().persist(&BrokenStore).is_err());
    }
}

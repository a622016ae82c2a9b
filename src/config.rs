use std::{env, path::PathBuf, time::Duration};

use log::warn;

use crate::{gestures::GestureConfig, speech::SpeechOptions};

/// Process configuration, read from `LOOKISM_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding `settings.json`
    pub data_dir: PathBuf,

    /// Verbose logging and a faster simulated trip
    pub debug: bool,

    /// Profile to switch to on startup, as chosen during onboarding
    pub profile: Option<String>,

    /// Initial state reported by the headless host screen reader
    pub host_screen_reader: bool,

    pub speech: SpeechOptions,
    pub gestures: GestureConfig,

    /// Simulated speech length per character at rate 1.0
    pub ms_per_char: u64,

    /// Pause between simulated trip phases
    pub trip_pace: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".lookism"),
            debug: false,
            profile: None,
            host_screen_reader: false,
            speech: SpeechOptions::default(),
            gestures: GestureConfig::default(),
            ms_per_char: 45,
            trip_pace: Duration::from_secs(2),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("LOOKISM_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        config.debug = env_flag("LOOKISM_DEBUG");
        config.host_screen_reader = env_flag("LOOKISM_HOST_SCREEN_READER");
        config.profile = env::var("LOOKISM_PROFILE")
            .ok()
            .filter(|value| !value.trim().is_empty());

        if let Ok(raw) = env::var("LOOKISM_SPEECH_RATE") {
            match raw.parse::<f32>() {
                Ok(rate) if rate > 0.0 && rate.is_finite() => config.speech.rate = rate,
                _ => warn!("Ignoring invalid LOOKISM_SPEECH_RATE={raw:?}"),
            }
        }

        if config.debug {
            config.ms_per_char = 5;
            config.trip_pace = Duration::from_millis(200);
        }

        config
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

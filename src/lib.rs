pub mod accessibility;
pub mod config;
pub mod error;
pub mod gestures;
pub mod platform;
pub mod profiles;
pub mod runtime;
pub mod settings;
pub mod speech;
pub mod trip;
mod utils;

#[cfg(test)]
mod testing;

use std::{fs, sync::Arc, time::Duration};

use anyhow::Result;
use log::{error, info, warn};
use tokio::sync::mpsc;

pub use accessibility::{
    AccessibilityModeController, AccessibilitySettings, AccessibilitySnapshot,
};
pub use config::AppConfig;
pub use error::AccessibilityError;
pub use gestures::{GestureConfig, GestureEvent, GestureSignalDetector};
pub use platform::{HapticPattern, HeadlessPlatform, HostPlatform};
pub use profiles::{VisionProfile, VisionProfileId};
pub use runtime::AccessibilityRuntime;
pub use settings::{JsonFileStore, KeyValueStore, MemoryStore};
pub use speech::{AnnouncementScheduler, Priority, SpeechDevice, SpeechEvent, SpeechOptions};

/// Open the settings file, degrading to session-only settings if the data
/// directory is unusable.
fn open_settings_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    let result = (|| -> Result<JsonFileStore> {
        fs::create_dir_all(&config.data_dir)?;
        JsonFileStore::new(config.settings_path())
    })();

    match result {
        Ok(store) => {
            info!("Settings stored in {}", store.path().display());
            Arc::new(store)
        }
        Err(err) => {
            warn!("Settings will not persist this session: {err:#}");
            Arc::new(MemoryStore::new())
        }
    }
}

pub fn run() -> Result<()> {
    let config = AppConfig::from_env();

    // Initialize logging (reads RUST_LOG env var)
    let default_level = if config.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    log::info!("Lookism starting up...");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let store = open_settings_store(&config);
        let platform = Arc::new(HeadlessPlatform::new(config.host_screen_reader));

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let device = speech::SimulatedSpeechDevice::new(events_tx, config.ms_per_char);
        let scheduler = AnnouncementScheduler::with_options(device, config.speech.clone());
        let controller =
            AccessibilityModeController::initialize(store, platform.clone(), scheduler);
        let accessibility = AccessibilityRuntime::start(controller, events_rx);

        if let Some(profile) = config.profile.as_deref() {
            if let Err(err) = accessibility.set_profile(profile).await {
                error!("{err}");
            }
        }

        let snapshot = accessibility.snapshot().await;
        info!(
            "Active profile: {} (screen reader {})",
            snapshot.profile.display_name,
            if snapshot.screen_reader_active { "on" } else { "off" }
        );

        let mut detector = GestureSignalDetector::new(config.gestures.clone(), platform.clone())?;
        trip::simulation::run_simulated_trip(
            &accessibility,
            &mut detector,
            platform.as_ref(),
            "Hospital General",
            config.trip_pace,
        )
        .await?;

        accessibility.wait_until_idle(Duration::from_millis(50)).await;
        accessibility.shutdown().await;
        info!("Lookism finished");
        Ok::<(), anyhow::Error>(())
    })
}

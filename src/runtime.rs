use std::{sync::Arc, time::Duration};

use log::{error, info};
use tokio::{
    sync::{mpsc::UnboundedReceiver, Mutex},
    task::JoinHandle,
    time,
};

use crate::{
    accessibility::{AccessibilityModeController, AccessibilitySettings, AccessibilitySnapshot},
    error::AccessibilityError,
    settings::KeyValueStore,
    speech::{Priority, SpeechDevice, SpeechEvent},
    trip::TripEvent,
};

/// Process-wide composition of the accessibility core.
///
/// The controller sits behind one async mutex and every mutation, including
/// device callbacks delivered by the event pump, takes that lock, so state
/// transitions happen strictly one at a time.
pub struct AccessibilityRuntime<S: KeyValueStore, D: SpeechDevice> {
    controller: Arc<Mutex<AccessibilityModeController<S, D>>>,
    pump: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<S: KeyValueStore, D: SpeechDevice> Clone for AccessibilityRuntime<S, D> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            pump: self.pump.clone(),
        }
    }
}

impl<S, D> AccessibilityRuntime<S, D>
where
    S: KeyValueStore + 'static,
    D: SpeechDevice + 'static,
{
    /// Wrap `controller` and start feeding it device outcomes from `events`.
    /// Must be called from inside a tokio runtime.
    pub fn start(
        controller: AccessibilityModeController<S, D>,
        mut events: UnboundedReceiver<SpeechEvent>,
    ) -> Self {
        let controller = Arc::new(Mutex::new(controller));
        let pump_controller = controller.clone();

        let handle = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                pump_controller.lock().await.handle_speech_event(event);
            }
            info!("Speech event channel closed");
        });

        Self {
            controller,
            pump: Arc::new(Mutex::new(Some(handle))),
        }
    }

    pub fn controller(&self) -> Arc<Mutex<AccessibilityModeController<S, D>>> {
        self.controller.clone()
    }

    pub async fn announce(&self, text: impl Into<String>, priority: Priority) -> bool {
        self.controller.lock().await.announce(text, priority)
    }

    pub async fn announce_trip_event(&self, event: &TripEvent) -> bool {
        self.announce(event.message(), event.priority()).await
    }

    pub async fn set_profile(
        &self,
        profile_id: &str,
    ) -> Result<AccessibilitySettings, AccessibilityError> {
        self.controller.lock().await.set_profile(profile_id)
    }

    pub async fn toggle_screen_reader(&self) -> AccessibilitySettings {
        self.controller.lock().await.toggle_screen_reader()
    }

    pub async fn is_screen_reader_active(&self) -> bool {
        self.controller.lock().await.is_screen_reader_active()
    }

    pub async fn refresh_host_screen_reader(&self) -> bool {
        self.controller.lock().await.refresh_host_screen_reader()
    }

    pub async fn stop_all(&self) {
        self.controller.lock().await.stop_speaking();
    }

    pub async fn snapshot(&self) -> AccessibilitySnapshot {
        self.controller.lock().await.snapshot()
    }

    /// Handler for gesture bindings: announces `text` when invoked. The
    /// announcement is dispatched onto the runtime, so the handler can be
    /// called from synchronous gesture code.
    pub fn announcer(
        &self,
        text: impl Into<String>,
        priority: Priority,
    ) -> impl Fn() + Send + Sync + 'static {
        let runtime = self.clone();
        let text: String = text.into();
        move || {
            let runtime = runtime.clone();
            let text = text.clone();
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move {
                        runtime.announce(text, priority).await;
                    });
                }
                Err(_) => error!("Dropping gesture announcement {text:?}: no async runtime"),
            }
        }
    }

    /// Resolve once nothing is playing or queued.
    pub async fn wait_until_idle(&self, poll: Duration) {
        loop {
            {
                let controller = self.controller.lock().await;
                let scheduler = controller.scheduler();
                if !scheduler.is_speaking() && scheduler.pending_len() == 0 {
                    return;
                }
            }
            time::sleep(poll).await;
        }
    }

    pub async fn shutdown(&self) {
        self.stop_all().await;
        if let Some(handle) = self.pump.lock().await.take() {
            handle.abort();
        }
    }
}

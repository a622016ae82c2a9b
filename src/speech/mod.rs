pub mod device;
pub mod scheduler;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use device::SimulatedSpeechDevice;
pub use scheduler::{AnnouncementMessage, AnnouncementScheduler, SchedulerState};

/// Announcement priority, lowest first. Only `Urgent` interrupts speech.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    Low = 0,
    Normal = 1,
    High = 2,
    Urgent = 3,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpeechOptions {
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            language: "es-ES".into(),
            // Slightly slower than the engine default.
            rate: 0.9,
            pitch: 1.0,
        }
    }
}

/// How an utterance ended, as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    Finished,
    Stopped,
    Error(String),
}

/// Device report for one utterance, delivered back to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechEvent {
    pub utterance: Uuid,
    pub outcome: SpeechOutcome,
}

impl SpeechEvent {
    pub fn finished(utterance: Uuid) -> Self {
        Self {
            utterance,
            outcome: SpeechOutcome::Finished,
        }
    }

    pub fn stopped(utterance: Uuid) -> Self {
        Self {
            utterance,
            outcome: SpeechOutcome::Stopped,
        }
    }

    pub fn error(utterance: Uuid, reason: impl Into<String>) -> Self {
        Self {
            utterance,
            outcome: SpeechOutcome::Error(reason.into()),
        }
    }
}

/// Text-to-speech output. Owned exclusively by [`AnnouncementScheduler`].
///
/// Both calls return immediately. Completion, interruption and playback
/// errors are reported later as [`SpeechEvent`]s tagged with the utterance id
/// passed to `speak`. An `Err` from `speak` means the utterance never started.
pub trait SpeechDevice: Send {
    fn speak(&mut self, utterance: Uuid, text: &str, options: &SpeechOptions) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

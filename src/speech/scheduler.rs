use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{log_debug, log_error, log_info};

use super::{Priority, SpeechDevice, SpeechEvent, SpeechOptions, SpeechOutcome};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SchedulerState {
    Idle,
    Speaking,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementMessage {
    pub id: Uuid,
    pub text: String,
    pub priority: Priority,
    pub enqueued_at: DateTime<Utc>,
    /// Monotonic enqueue counter. Breaks ties inside a priority band even when
    /// two messages share a wall-clock timestamp.
    #[serde(skip)]
    seq: u64,
}

impl AnnouncementMessage {
    fn runs_before(&self, other: &AnnouncementMessage) -> bool {
        self.priority > other.priority || (self.priority == other.priority && self.seq < other.seq)
    }
}

/// Serialises announcements into a single speech device.
///
/// Non-urgent messages wait in priority order and are drained one at a time as
/// the device reports completion. Urgent messages flush the queue and
/// interrupt whatever is playing.
pub struct AnnouncementScheduler<D: SpeechDevice> {
    device: D,
    options: SpeechOptions,
    pending: VecDeque<AnnouncementMessage>,
    current: Option<AnnouncementMessage>,
    next_seq: u64,
}

impl<D: SpeechDevice> AnnouncementScheduler<D> {
    pub fn new(device: D) -> Self {
        Self::with_options(device, SpeechOptions::default())
    }

    pub fn with_options(device: D, options: SpeechOptions) -> Self {
        Self {
            device,
            options,
            pending: VecDeque::new(),
            current: None,
            next_seq: 0,
        }
    }

    pub fn enqueue(&mut self, text: impl Into<String>, priority: Priority) -> Uuid {
        let message = AnnouncementMessage {
            id: Uuid::new_v4(),
            text: text.into(),
            priority,
            enqueued_at: Utc::now(),
            seq: self.next_seq,
        };
        self.next_seq = self.next_seq.wrapping_add(1);
        let id = message.id;

        if priority == Priority::Urgent {
            self.pending.clear();
            if let Some(interrupted) = self.current.take() {
                log_debug!("urgent announcement interrupts {:?}", interrupted.text);
                if let Err(err) = self.device.stop() {
                    log_error!("Failed to stop speech device: {}", err);
                }
            }
            self.start(message);
            return id;
        }

        let position = self
            .pending
            .partition_point(|queued| !message.runs_before(queued));
        self.pending.insert(position, message);

        if self.current.is_none() {
            self.drain();
        }

        id
    }

    /// The device finished the utterance, or failed while playing it.
    pub fn on_device_finished(&mut self, utterance: Uuid) {
        if !self.is_current(utterance) {
            log_debug!("ignoring completion of stale utterance {}", utterance);
            return;
        }
        self.current = None;
        self.drain();
    }

    /// The utterance was cut off. Draining resumes only on the next enqueue.
    pub fn on_device_stopped(&mut self, utterance: Uuid) {
        if !self.is_current(utterance) {
            log_debug!("ignoring stop of stale utterance {}", utterance);
            return;
        }
        self.current = None;
    }

    pub fn handle_event(&mut self, event: SpeechEvent) {
        match event.outcome {
            SpeechOutcome::Finished => self.on_device_finished(event.utterance),
            SpeechOutcome::Stopped => self.on_device_stopped(event.utterance),
            SpeechOutcome::Error(reason) => {
                // Never retried: a flaky device would loop on the same text.
                log_error!("Speech playback failed for {}: {}", event.utterance, reason);
                self.on_device_finished(event.utterance);
            }
        }
    }

    pub fn stop_all(&mut self) {
        if let Err(err) = self.device.stop() {
            log_error!("Failed to stop speech device: {}", err);
        }
        let dropped = self.pending.len();
        self.pending.clear();
        self.current = None;
        if dropped > 0 {
            log_info!("Dropped {} pending announcements", dropped);
        }
    }

    /// Drop everything waiting but let the current utterance finish.
    pub fn clear_queue(&mut self) {
        self.pending.clear();
    }

    pub fn state(&self) -> SchedulerState {
        if self.current.is_some() {
            SchedulerState::Speaking
        } else {
            SchedulerState::Idle
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&AnnouncementMessage> {
        self.current.as_ref()
    }

    pub fn pending(&self) -> impl Iterator<Item = &AnnouncementMessage> {
        self.pending.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn options(&self) -> &SpeechOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: SpeechOptions) {
        self.options = options;
    }

    fn is_current(&self, utterance: Uuid) -> bool {
        self.current.as_ref().map(|m| m.id) == Some(utterance)
    }

    fn drain(&mut self) {
        while self.current.is_none() {
            let Some(next) = self.pending.pop_front() else {
                break;
            };
            self.start(next);
        }
    }

    fn start(&mut self, message: AnnouncementMessage) {
        match self.device.speak(message.id, &message.text, &self.options) {
            Ok(()) => {
                log_debug!("speaking [{:?}] {:?}", message.priority, message.text);
                self.current = Some(message);
            }
            Err(err) => {
                log_error!(
                    "Speech device rejected {:?}, skipping it: {}",
                    message.text,
                    err
                );
            }
        }
    }
}

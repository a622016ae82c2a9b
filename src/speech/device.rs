use std::{
    sync::mpsc::{self, RecvTimeoutError, Sender},
    thread,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Result};
use log::info;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use super::{SpeechDevice, SpeechEvent, SpeechOptions};

enum SpeechCommand {
    Speak { utterance: Uuid, text: String, rate: f32 },
    Stop,
}

/// Stand-in for the platform synthesizer.
///
/// Each utterance "plays" on a dedicated thread for a time proportional to its
/// length and reports its outcome on `events`, the same way a native TTS
/// engine calls back into the app.
pub struct SimulatedSpeechDevice {
    tx: Option<Sender<SpeechCommand>>,
    events: UnboundedSender<SpeechEvent>,
    ms_per_char: u64,
}

impl SimulatedSpeechDevice {
    pub fn new(events: UnboundedSender<SpeechEvent>, ms_per_char: u64) -> Self {
        Self {
            tx: None,
            events,
            ms_per_char,
        }
    }

    fn ensure_thread(&mut self) -> Result<Sender<SpeechCommand>> {
        if let Some(tx) = self.tx.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<SpeechCommand>();
        let events = self.events.clone();
        let ms_per_char = self.ms_per_char;

        thread::Builder::new()
            .name("speech-engine".to_string())
            .spawn(move || {
                let mut playing: Option<(Uuid, Instant)> = None;

                loop {
                    let command = match playing {
                        Some((utterance, ends_at)) => {
                            let wait = ends_at.saturating_duration_since(Instant::now());
                            match rx.recv_timeout(wait) {
                                Ok(command) => command,
                                Err(RecvTimeoutError::Timeout) => {
                                    playing = None;
                                    let _ = events.send(SpeechEvent::finished(utterance));
                                    continue;
                                }
                                Err(RecvTimeoutError::Disconnected) => break,
                            }
                        }
                        None => match rx.recv() {
                            Ok(command) => command,
                            Err(_) => break,
                        },
                    };

                    match command {
                        SpeechCommand::Speak {
                            utterance,
                            text,
                            rate,
                        } => {
                            if let Some((previous, _)) = playing.take() {
                                let _ = events.send(SpeechEvent::stopped(previous));
                            }
                            info!("[voz] {}", text);
                            let length = utterance_length(&text, rate, ms_per_char);
                            playing = Some((utterance, Instant::now() + length));
                        }
                        SpeechCommand::Stop => {
                            if let Some((previous, _)) = playing.take() {
                                let _ = events.send(SpeechEvent::stopped(previous));
                            }
                        }
                    }
                }
            })
            .map_err(|e| anyhow!("failed to spawn speech thread: {e}"))?;

        let tx_clone = tx.clone();
        self.tx = Some(tx);
        Ok(tx_clone)
    }
}

impl SpeechDevice for SimulatedSpeechDevice {
    fn speak(&mut self, utterance: Uuid, text: &str, options: &SpeechOptions) -> Result<()> {
        let tx = self.ensure_thread()?;
        tx.send(SpeechCommand::Speak {
            utterance,
            text: text.to_string(),
            rate: options.rate,
        })
        .map_err(|e| anyhow!("speech thread gone: {e}"))
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(tx) = self.tx.as_ref() {
            let _ = tx.send(SpeechCommand::Stop);
        }
        Ok(())
    }
}

fn utterance_length(text: &str, rate: f32, ms_per_char: u64) -> Duration {
    let rate = if rate.is_finite() && rate > 0.0 { rate } else { 1.0 };
    let chars = text.chars().count() as f64;
    Duration::from_millis((chars * ms_per_char as f64 / rate as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::SpeechOutcome;

    #[test]
    fn slower_rate_speaks_longer() {
        let normal = utterance_length("Tu conductor ha llegado", 1.0, 10);
        let slow = utterance_length("Tu conductor ha llegado", 0.5, 10);
        assert_eq!(slow, normal * 2);
        assert_eq!(utterance_length("hola", 0.0, 10), Duration::from_millis(40));
    }

    #[tokio::test]
    async fn reports_finished_after_playback() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut device = SimulatedSpeechDevice::new(tx, 1);
        let id = Uuid::new_v4();

        device.speak(id, "hola", &SpeechOptions::default()).unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event, SpeechEvent::finished(id));
    }

    #[tokio::test]
    async fn stop_reports_stopped() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut device = SimulatedSpeechDevice::new(tx, 1_000);
        let id = Uuid::new_v4();

        device.speak(id, "un mensaje largo", &SpeechOptions::default()).unwrap();
        device.stop().unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.utterance, id);
        assert_eq!(event.outcome, SpeechOutcome::Stopped);
    }
}

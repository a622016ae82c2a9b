//! Fakes shared by the unit tests of several modules.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use uuid::Uuid;

use crate::{
    platform::{HapticPattern, HostPlatform},
    settings::KeyValueStore,
    speech::{SpeechDevice, SpeechOptions},
};

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Speak { id: Uuid, text: String },
    Stop,
}

#[derive(Default)]
struct DeviceLog {
    calls: Vec<DeviceCall>,
    fail_speaks: usize,
    busy: Option<Uuid>,
    overlaps: usize,
    last_options: Option<SpeechOptions>,
}

/// Speech device that records every call. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingDevice {
    log: Arc<Mutex<DeviceLog>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.log.lock().unwrap().calls.clone()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DeviceCall::Speak { text, .. } => Some(text),
                DeviceCall::Stop => None,
            })
            .collect()
    }

    pub fn stop_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, DeviceCall::Stop))
            .count()
    }

    pub fn last_options(&self) -> Option<SpeechOptions> {
        self.log.lock().unwrap().last_options.clone()
    }

    pub fn fail_next_speaks(&self, count: usize) {
        self.log.lock().unwrap().fail_speaks = count;
    }

    /// Marks the utterance as played out, as the real device would before
    /// reporting completion.
    pub fn complete(&self, utterance: Uuid) {
        let mut log = self.log.lock().unwrap();
        if log.busy == Some(utterance) {
            log.busy = None;
        }
    }

    /// Number of `speak` calls that arrived while another utterance was
    /// still playing.
    pub fn overlaps(&self) -> usize {
        self.log.lock().unwrap().overlaps
    }
}

impl SpeechDevice for RecordingDevice {
    fn speak(&mut self, utterance: Uuid, text: &str, options: &SpeechOptions) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        if log.fail_speaks > 0 {
            log.fail_speaks -= 1;
            return Err(anyhow!("synthesizer unavailable"));
        }
        if log.busy.is_some() {
            log.overlaps += 1;
        }
        log.busy = Some(utterance);
        log.last_options = Some(options.clone());
        log.calls.push(DeviceCall::Speak {
            id: utterance,
            text: text.to_string(),
        });
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        log.busy = None;
        log.calls.push(DeviceCall::Stop);
        Ok(())
    }
}

/// Host platform with a settable screen-reader flag and a haptics log.
#[derive(Default)]
pub struct FakePlatform {
    pub screen_reader: Mutex<bool>,
    pub fail_haptics: bool,
    pub fail_query: bool,
    pub vibrations: Mutex<Vec<HapticPattern>>,
}

impl FakePlatform {
    pub fn with_screen_reader(enabled: bool) -> Self {
        Self {
            screen_reader: Mutex::new(enabled),
            ..Default::default()
        }
    }

    pub fn vibrations(&self) -> Vec<HapticPattern> {
        self.vibrations.lock().unwrap().clone()
    }
}

impl HostPlatform for FakePlatform {
    fn is_screen_reader_enabled(&self) -> Result<bool> {
        if self.fail_query {
            return Err(anyhow!("accessibility service unavailable"));
        }
        Ok(*self.screen_reader.lock().unwrap())
    }

    fn vibrate(&self, pattern: HapticPattern) -> Result<()> {
        if self.fail_haptics {
            return Err(anyhow!("no vibrator"));
        }
        self.vibrations.lock().unwrap().push(pattern);
        Ok(())
    }
}

/// Store whose reads and writes always fail.
pub struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow!("storage offline"))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("storage offline"))
    }
}

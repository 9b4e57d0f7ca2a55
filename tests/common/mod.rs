// Shared fakes for relay tests
//
// The capability fakes record their calls and can be told to fail for chosen
// languages, so tests can exercise partial-failure paths deterministically.

#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use babel_relay::capability::{
    Capabilities, SpeechRecognizer, SpeechSynthesizer, Translator, VoiceSelection,
};
use babel_relay::session::{DeliveryPacket, Participant, SessionRegistry};
use babel_relay::{AppState, Config};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// 10ms of 16kHz 16-bit mono audio
pub const TEST_UTTERANCE_MS: u64 = 10;
pub const TEST_UTTERANCE_BYTES: usize = 320;

/// Recognizer that answers every utterance with the same outcome
pub struct FakeRecognizer {
    outcome: Mutex<Result<Option<String>, String>>,
    calls: Mutex<Vec<(usize, String)>>,
}

impl FakeRecognizer {
    pub fn hearing(text: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(Ok(Some(text.to_string()))),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn silent() -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(Ok(None)),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(Err("quota exceeded".to_string())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn set_text(&self, text: Option<&str>) {
        *self.outcome.lock().unwrap() = Ok(text.map(str::to_string));
    }

    /// (utterance length, language) per call
    pub fn calls(&self) -> Vec<(usize, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechRecognizer for FakeRecognizer {
    async fn recognize(&self, audio: &[u8], language_code: &str) -> Result<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .push((audio.len(), language_code.to_string()));

        match &*self.outcome.lock().unwrap() {
            Ok(text) => Ok(text.clone()),
            Err(message) => bail!("{}", message),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Translator with canned translations per base language
#[derive(Default)]
pub struct FakeTranslator {
    translations: HashMap<String, String>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(mut self, language: &str, text: &str) -> Self {
        self.translations.insert(language.to_string(), text.to_string());
        self
    }

    pub fn failing_for(mut self, language: &str) -> Self {
        self.failing.insert(language.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Target languages requested so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        self.calls.lock().unwrap().push(target_language.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(target_language) {
            bail!("translation unavailable for {}", target_language);
        }

        Ok(self
            .translations
            .get(target_language)
            .cloned()
            .unwrap_or_else(|| format!("{}:{}", target_language, text)))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Synthesizer whose "audio" spells out the voice and text
#[derive(Default)]
pub struct FakeSynthesizer {
    failing: HashSet<String>,
    voices: Mutex<Vec<VoiceSelection>>,
}

impl FakeSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail for this full language tag
    pub fn failing_for(mut self, language_code: &str) -> Self {
        self.failing.insert(language_code.to_string());
        self
    }

    pub fn voices(&self) -> Vec<VoiceSelection> {
        self.voices.lock().unwrap().clone()
    }

    pub fn audio_for(voice_name: &str, text: &str) -> Vec<u8> {
        format!("{}|{}", voice_name, text).into_bytes()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, text: &str, voice: &VoiceSelection) -> Result<Vec<u8>> {
        self.voices.lock().unwrap().push(voice.clone());

        if self.failing.contains(&voice.language_code) {
            bail!("no voice for {}", voice.language_code);
        }

        Ok(Self::audio_for(&voice.name, text))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

pub fn capabilities(
    recognizer: Arc<FakeRecognizer>,
    translator: Arc<FakeTranslator>,
    synthesizer: Arc<FakeSynthesizer>,
) -> Capabilities {
    Capabilities {
        recognizer,
        translator,
        synthesizer,
    }
}

/// Config with a tiny utterance threshold and short timeouts
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.audio.utterance_ms = TEST_UTTERANCE_MS;
    config.capabilities.timeout_ms = 500;
    config
}

pub fn app_state(capabilities: Capabilities) -> AppState {
    AppState::new(&test_config(), capabilities)
}

/// Participant backed by an in-memory outbound queue
pub fn participant(id: &str, lang: &str) -> (Participant, mpsc::Receiver<DeliveryPacket>) {
    let (tx, rx) = mpsc::channel(16);
    (Participant::new(id, lang, tx), rx)
}

/// Everything currently queued for a participant
pub fn drain(rx: &mut mpsc::Receiver<DeliveryPacket>) -> Vec<DeliveryPacket> {
    let mut packets = Vec::new();
    while let Ok(packet) = rx.try_recv() {
        packets.push(packet);
    }
    packets
}

/// Wait until the registry holds `expected` participants
pub async fn wait_for_participants(registry: &SessionRegistry, expected: usize) {
    for _ in 0..200 {
        if registry.len().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "registry never reached {} participants (has {})",
        expected,
        registry.len().await
    );
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::audio::AudioFormat;

/// Environment variable prefix, e.g. `BABEL_RELAY__GOOGLE__API_KEY`
pub const ENV_PREFIX: &str = "BABEL_RELAY";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub relay: RelayConfig,
    pub capabilities: CapabilityConfig,
    pub google: GoogleConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "babel-relay".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Inbound audio layout and how much of it makes one utterance
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub bytes_per_sample: u16,
    pub channels: u16,
    pub utterance_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // LINEAR16 at 16kHz
            bytes_per_sample: 2,
            channels: 1,
            utterance_ms: 1000,
        }
    }
}

impl AudioConfig {
    pub fn format(&self) -> AudioFormat {
        AudioFormat {
            sample_rate: self.sample_rate,
            bytes_per_sample: self.bytes_per_sample,
            channels: self.channels,
        }
    }

    pub fn utterance_duration(&self) -> Duration {
        Duration::from_millis(self.utterance_ms)
    }

    /// Byte threshold at which a participant's buffer is flushed to recognition
    pub fn utterance_bytes(&self) -> usize {
        self.format().bytes_for(self.utterance_duration())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Language assumed when the configuration message omits `lang`
    pub default_lang: String,
    /// Depth of each participant's outbound queue; packets beyond it are dropped
    pub outbound_queue: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            default_lang: "en-US".to_string(),
            outbound_queue: 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityBackend {
    Google,
    Stub,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CapabilityConfig {
    pub backend: CapabilityBackend,
    /// Upper bound on every recognition, translation and synthesis call
    pub timeout_ms: u64,
    pub voice_variant: String,
    pub audio_encoding: String,
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            backend: CapabilityBackend::Google,
            timeout_ms: 10_000,
            voice_variant: "Standard-A".to_string(),
            audio_encoding: "MP3".to_string(),
        }
    }
}

impl CapabilityConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub api_key: String,
    pub speech_url: String,
    pub translate_url: String,
    pub tts_url: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            speech_url: "https://speech.googleapis.com/v1/speech:recognize".to_string(),
            translate_url: "https://translation.googleapis.com/language/translate/v2".to_string(),
            tts_url: "https://texttospeech.googleapis.com/v1/text:synthesize".to_string(),
        }
    }
}

impl Config {
    /// Load from a file (extension optional, missing file allowed) overlaid by environment
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        settings
            .try_deserialize()
            .context("Failed to deserialize config")
    }
}

//! External speech capabilities
//!
//! Recognition, translation and synthesis are consumed through narrow traits:
//! - `SpeechRecognizer` - PCM audio + language tag -> best transcript
//! - `Translator` - text + base language code -> translated text
//! - `SpeechSynthesizer` - text + voice -> encoded audio
//!
//! Implementations report failures as errors; the pipeline gateways decide how
//! those are absorbed.

pub mod google;
pub mod stub;

use anyhow::Result;
use std::sync::Arc;

use crate::config::{CapabilityBackend, Config};

/// Voice used for synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSelection {
    /// Full language tag, e.g. "es-MX"
    pub language_code: String,
    /// Voice name, e.g. "es-MX-Standard-A"
    pub name: String,
}

impl VoiceSelection {
    pub fn for_language(language_code: &str, variant: &str) -> Self {
        Self {
            language_code: language_code.to_string(),
            name: format!("{}-{}", language_code, variant),
        }
    }
}

/// Speech-to-text engine
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe linear PCM audio
    ///
    /// Returns `Ok(None)` when the engine produced no usable result
    async fn recognize(&self, audio: &[u8], language_code: &str) -> Result<Option<String>>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Text translation engine
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String>;

    fn name(&self) -> &str;
}

/// Text-to-speech engine
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &VoiceSelection) -> Result<Vec<u8>>;

    fn name(&self) -> &str;
}

/// The three capabilities the relay depends on
#[derive(Clone)]
pub struct Capabilities {
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub translator: Arc<dyn Translator>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

/// Capability backend factory
pub struct CapabilityFactory;

impl CapabilityFactory {
    /// Create capability clients for the configured backend
    pub fn create(config: &Config) -> Result<Capabilities> {
        match config.capabilities.backend {
            CapabilityBackend::Google => google::GoogleCloud::new(
                &config.google,
                config.audio.sample_rate,
                &config.capabilities.audio_encoding,
                config.capabilities.timeout(),
            )
            .map(google::GoogleCloud::into_capabilities),

            CapabilityBackend::Stub => Ok(stub::capabilities()),
        }
    }
}

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::bounded;
use crate::capability::{SpeechSynthesizer, Translator, VoiceSelection};

/// Base language of a tag: "es-MX" -> "es"
pub fn base_language(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

/// Outcome of localizing one utterance for one recipient
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Localized {
    /// Translated text; absent when translation failed
    pub text: Option<String>,
    /// Synthesized speech of `text`; absent when either step failed
    pub audio: Option<Vec<u8>>,
}

/// Translation followed by speech synthesis, per target language
pub struct LocalizationPipeline {
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    voice_variant: String,
    timeout: Duration,
}

impl LocalizationPipeline {
    pub fn new(
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        voice_variant: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            translator,
            synthesizer,
            voice_variant: voice_variant.into(),
            timeout,
        }
    }

    /// Translate `text` into `target` and voice it
    ///
    /// Translation uses the base language, voice selection the full tag. A failed
    /// translation skips synthesis; a failed synthesis still returns the text.
    pub async fn localize(&self, text: &str, target: &str) -> Localized {
        let Some(translated) = self.translate(text, target).await else {
            return Localized::default();
        };

        let audio = self.synthesize(&translated, target).await;

        Localized {
            text: Some(translated),
            audio,
        }
    }

    async fn translate(&self, text: &str, target: &str) -> Option<String> {
        let language = base_language(target);

        match bounded(self.timeout, self.translator.translate(text, language)).await {
            Ok(translated) if translated.trim().is_empty() => {
                debug!(lang = target, "Translation returned empty text");
                None
            }
            Ok(translated) => {
                debug!(lang = target, "Translated: {}", translated);
                Some(translated)
            }
            Err(e) => {
                warn!(
                    translator = self.translator.name(),
                    lang = target,
                    "Translation failed: {:#}",
                    e
                );
                None
            }
        }
    }

    async fn synthesize(&self, text: &str, target: &str) -> Option<Vec<u8>> {
        let voice = VoiceSelection::for_language(target, &self.voice_variant);

        match bounded(self.timeout, self.synthesizer.synthesize(text, &voice)).await {
            Ok(audio) if audio.is_empty() => {
                debug!(voice = %voice.name, "Synthesis returned no audio");
                None
            }
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!(
                    synthesizer = self.synthesizer.name(),
                    voice = %voice.name,
                    "Speech synthesis failed: {:#}",
                    e
                );
                None
            }
        }
    }
}

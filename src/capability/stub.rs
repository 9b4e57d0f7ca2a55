//! Offline capability implementations for local runs; they never call out.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::{Capabilities, SpeechRecognizer, SpeechSynthesizer, Translator, VoiceSelection};

/// Reports the size of every utterance as its transcript
pub struct StubRecognizer;

#[async_trait]
impl SpeechRecognizer for StubRecognizer {
    async fn recognize(&self, audio: &[u8], _language_code: &str) -> Result<Option<String>> {
        Ok(Some(format!("{} bytes of audio", audio.len())))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Prefixes text with the target language instead of translating it
pub struct StubTranslator;

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        Ok(format!("[{}] {}", target_language, text))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Returns the UTF-8 bytes of the text as "audio"
pub struct StubSynthesizer;

#[async_trait]
impl SpeechSynthesizer for StubSynthesizer {
    async fn synthesize(&self, text: &str, _voice: &VoiceSelection) -> Result<Vec<u8>> {
        Ok(text.as_bytes().to_vec())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

pub fn capabilities() -> Capabilities {
    Capabilities {
        recognizer: Arc::new(StubRecognizer),
        translator: Arc::new(StubTranslator),
        synthesizer: Arc::new(StubSynthesizer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_translator_tags_target_language() {
        let translated = StubTranslator.translate("hello", "es").await.unwrap();
        assert_eq!(translated, "[es] hello");
    }

    #[tokio::test]
    async fn stub_recognizer_always_produces_text() {
        let text = StubRecognizer.recognize(&[0u8; 10], "en-US").await.unwrap();
        assert_eq!(text.as_deref(), Some("10 bytes of audio"));
    }
}

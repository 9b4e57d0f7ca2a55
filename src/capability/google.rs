//! Google Cloud Speech-to-Text, Translation (v2) and Text-to-Speech over REST

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{Capabilities, SpeechRecognizer, SpeechSynthesizer, Translator, VoiceSelection};
use crate::config::GoogleConfig;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'a str,
    sample_rate_hertz: u32,
    language_code: &'a str,
    enable_automatic_punctuation: bool,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
}

impl RecognizeResponse {
    /// Best alternative of the first result that has any
    pub(crate) fn best_transcript(self) -> Option<String> {
        self.results
            .into_iter()
            .find_map(|result| result.alternatives.into_iter().next())
            .map(|alternative| alternative.transcript.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranslateResponse {
    data: TranslationList,
}

#[derive(Debug, Deserialize)]
struct TranslationList {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

impl TranslateResponse {
    pub(crate) fn first_translation(self) -> Option<String> {
        self.data
            .translations
            .into_iter()
            .next()
            .map(|translation| translation.translated_text)
    }
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceParams<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioParams<'a> {
    audio_encoding: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceParams<'a>,
    audio_config: AudioParams<'a>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: String,
}

// ============================================================================
// Client
// ============================================================================

/// One HTTP client serving all three Google capabilities
pub struct GoogleCloud {
    http: reqwest::Client,
    config: GoogleConfig,
    sample_rate: u32,
    audio_encoding: String,
}

impl GoogleCloud {
    pub fn new(
        config: &GoogleConfig,
        sample_rate: u32,
        audio_encoding: &str,
        timeout: Duration,
    ) -> Result<Self> {
        if config.api_key.is_empty() {
            bail!("google.api_key must be set when capabilities.backend = \"google\"");
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            config: config.clone(),
            sample_rate,
            audio_encoding: audio_encoding.to_string(),
        })
    }

    pub fn into_capabilities(self) -> Capabilities {
        let client = Arc::new(self);
        Capabilities {
            recognizer: client.clone(),
            translator: client.clone(),
            synthesizer: client,
        }
    }

    async fn post<Req, Resp>(&self, url: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: for<'de> Deserialize<'de>,
    {
        let response = self
            .http
            .post(url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("HTTP error: {} - {}", status, error_text));
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to decode response from {}", url))
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleCloud {
    async fn recognize(&self, audio: &[u8], language_code: &str) -> Result<Option<String>> {
        let request = RecognizeRequest {
            config: RecognitionConfig {
                encoding: "LINEAR16",
                sample_rate_hertz: self.sample_rate,
                language_code,
                enable_automatic_punctuation: true,
            },
            audio: RecognitionAudio {
                content: base64::engine::general_purpose::STANDARD.encode(audio),
            },
        };

        let response: RecognizeResponse = self.post(&self.config.speech_url, &request).await?;
        debug!(
            "Speech recognition returned {} result(s)",
            response.results.len()
        );

        Ok(response.best_transcript())
    }

    fn name(&self) -> &str {
        "google-speech"
    }
}

#[async_trait]
impl Translator for GoogleCloud {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        let request = TranslateRequest {
            q: text,
            target: target_language,
            format: "text",
        };

        let response: TranslateResponse = self.post(&self.config.translate_url, &request).await?;

        response
            .first_translation()
            .ok_or_else(|| anyhow!("Translation response contained no translations"))
    }

    fn name(&self) -> &str {
        "google-translate"
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleCloud {
    async fn synthesize(&self, text: &str, voice: &VoiceSelection) -> Result<Vec<u8>> {
        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceParams {
                language_code: &voice.language_code,
                name: &voice.name,
            },
            audio_config: AudioParams {
                audio_encoding: &self.audio_encoding,
            },
        };

        let response: SynthesizeResponse = self.post(&self.config.tts_url, &request).await?;

        base64::engine::general_purpose::STANDARD
            .decode(response.audio_content)
            .context("Failed to decode synthesized audio")
    }

    fn name(&self) -> &str {
        "google-tts"
    }
}

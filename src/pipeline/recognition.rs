use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::bounded;
use crate::audio::Utterance;
use crate::capability::SpeechRecognizer;

/// Speech-to-text behind an "audio in, maybe text out" contract
pub struct RecognitionGateway {
    recognizer: Arc<dyn SpeechRecognizer>,
    timeout: Duration,
}

impl RecognitionGateway {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, timeout: Duration) -> Self {
        Self {
            recognizer,
            timeout,
        }
    }

    /// Transcribe one utterance; `None` on no result, blank result or any failure
    pub async fn recognize(&self, audio: &Utterance, language_code: &str) -> Option<String> {
        let outcome = bounded(
            self.timeout,
            self.recognizer.recognize(audio.as_bytes(), language_code),
        )
        .await;

        match outcome {
            Ok(Some(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    debug!(lang = language_code, "Recognition returned blank transcript");
                    None
                } else {
                    Some(text.to_string())
                }
            }
            Ok(None) => {
                debug!(
                    lang = language_code,
                    bytes = audio.len(),
                    "Recognition produced no result"
                );
                None
            }
            Err(e) => {
                warn!(
                    recognizer = self.recognizer.name(),
                    lang = language_code,
                    "Speech recognition failed: {:#}",
                    e
                );
                None
            }
        }
    }
}

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

use super::packet::{DeliveryPacket, Subtitle};
use super::registry::{Participant, SessionRegistry};
use super::stats::BroadcastReport;
use crate::pipeline::LocalizationPipeline;

/// Fans one recognized utterance out to every other participant
pub struct Broadcaster {
    registry: SessionRegistry,
    localization: Arc<LocalizationPipeline>,
}

/// Result of delivering to a single recipient
#[derive(Debug, Default)]
struct RecipientOutcome {
    subtitle: bool,
    audio: bool,
}

impl Broadcaster {
    pub fn new(registry: SessionRegistry, localization: Arc<LocalizationPipeline>) -> Self {
        Self {
            registry,
            localization,
        }
    }

    /// Localize and deliver `text` spoken by `sender_id` (in `source_lang`)
    ///
    /// Recipients are served concurrently and independently; failures for one
    /// are logged and never affect the others or the sender.
    pub async fn broadcast(
        &self,
        sender_id: &str,
        source_lang: &str,
        text: &str,
    ) -> BroadcastReport {
        let recipients: Vec<Participant> = self
            .registry
            .snapshot()
            .await
            .into_iter()
            .filter(|participant| participant.id != sender_id)
            .collect();

        let outcomes = join_all(
            recipients
                .iter()
                .map(|recipient| self.deliver_to(recipient, sender_id, source_lang, text)),
        )
        .await;

        let report = BroadcastReport {
            recipients: recipients.len(),
            subtitles_delivered: outcomes.iter().filter(|o| o.subtitle).count(),
            audio_delivered: outcomes.iter().filter(|o| o.audio).count(),
        };

        debug!(
            user_id = %sender_id,
            recipients = report.recipients,
            subtitles = report.subtitles_delivered,
            audio = report.audio_delivered,
            "Broadcast complete"
        );

        report
    }

    async fn deliver_to(
        &self,
        recipient: &Participant,
        sender_id: &str,
        source_lang: &str,
        text: &str,
    ) -> RecipientOutcome {
        let localized = self.localization.localize(text, &recipient.lang).await;
        let mut outcome = RecipientOutcome::default();

        if let Some(translated) = localized.text {
            let subtitle = DeliveryPacket::Subtitle(Subtitle {
                from: sender_id.to_string(),
                source_lang: source_lang.to_string(),
                text_original: text.to_string(),
                text_translated: translated,
            });
            outcome.subtitle = Self::send(recipient, subtitle);
        }

        if let Some(audio) = localized.audio {
            outcome.audio = Self::send(recipient, DeliveryPacket::Audio(audio));
        }

        outcome
    }

    fn send(recipient: &Participant, packet: DeliveryPacket) -> bool {
        let kind = packet.kind();

        match recipient.deliver(packet) {
            Ok(()) => true,
            Err(e) => {
                warn!(user_id = %recipient.id, packet = kind, "Delivery failed: {}", e);
                false
            }
        }
    }
}

use anyhow::Result;
use futures::stream::{Stream, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::broadcaster::Broadcaster;
use super::packet::JoinRequest;
use super::registry::{Outbox, Participant, SessionRegistry};
use crate::audio::{AudioFormat, UtteranceBuffer};
use crate::pipeline::RecognitionGateway;

/// Transport-independent view of one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Text(String),
    Binary(Vec<u8>),
    Close,
}

/// Why a connection reached `Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Peer closed the stream or sent a close frame
    Disconnected,
    /// The transport reported an error
    TransportError,
    /// The first message was not a valid join request
    InvalidJoin,
}

/// Connection lifecycle: `Connecting → Active → Closed`
enum ConnectionState {
    Connecting,
    Active(ActiveConnection),
    Closed(CloseReason),
}

struct ActiveConnection {
    participant: Participant,
    buffer: UtteranceBuffer,
}

/// Drives every participant connection against the shared session
pub struct ConnectionHandler {
    registry: SessionRegistry,
    recognition: Arc<RecognitionGateway>,
    broadcaster: Arc<Broadcaster>,
    default_lang: String,
    audio_format: AudioFormat,
    utterance_duration: Duration,
    /// Source of generated identities
    next_user: AtomicUsize,
}

impl ConnectionHandler {
    pub fn new(
        registry: SessionRegistry,
        recognition: Arc<RecognitionGateway>,
        broadcaster: Arc<Broadcaster>,
        default_lang: impl Into<String>,
        audio_format: AudioFormat,
        utterance_duration: Duration,
    ) -> Self {
        Self {
            registry,
            recognition,
            broadcaster,
            default_lang: default_lang.into(),
            audio_format,
            utterance_duration,
            next_user: AtomicUsize::new(1),
        }
    }

    /// Run one connection to completion
    ///
    /// `outbox` is the participant's delivery channel; it is registered on join.
    /// Returns once the connection is closed and deregistered.
    pub async fn run<S>(&self, inbound: S, outbox: Outbox) -> CloseReason
    where
        S: Stream<Item = Result<InboundFrame>>,
    {
        let mut inbound = std::pin::pin!(inbound);
        let mut outbox = Some(outbox);
        let mut state = ConnectionState::Connecting;

        loop {
            state = match state {
                ConnectionState::Connecting => {
                    let frame = inbound.next().await;
                    self.on_connecting(frame, &mut outbox).await
                }
                ConnectionState::Active(connection) => {
                    let frame = inbound.next().await;
                    self.on_active(connection, frame).await
                }
                ConnectionState::Closed(reason) => return reason,
            };
        }
    }

    async fn on_connecting(
        &self,
        frame: Option<Result<InboundFrame>>,
        outbox: &mut Option<Outbox>,
    ) -> ConnectionState {
        let text = match frame {
            Some(Ok(InboundFrame::Text(text))) => text,
            Some(Ok(InboundFrame::Binary(_))) => {
                warn!("Audio received before join request, closing connection");
                return ConnectionState::Closed(CloseReason::InvalidJoin);
            }
            Some(Ok(InboundFrame::Close)) | None => {
                return ConnectionState::Closed(CloseReason::Disconnected);
            }
            Some(Err(e)) => {
                warn!("Connection failed before join: {:#}", e);
                return ConnectionState::Closed(CloseReason::TransportError);
            }
        };

        let request = match JoinRequest::parse(&text) {
            Ok(request) => request,
            Err(e) => {
                warn!("Invalid join request: {}", e);
                return ConnectionState::Closed(CloseReason::InvalidJoin);
            }
        };

        let Some(outbox) = outbox.take() else {
            return ConnectionState::Closed(CloseReason::InvalidJoin);
        };

        let id = request
            .user_id()
            .map(str::to_string)
            .unwrap_or_else(|| self.generate_user_id());
        let lang = request.lang().unwrap_or(&self.default_lang).to_string();

        let participant = Participant::new(id, lang, outbox);
        self.registry.join(participant.clone()).await;

        ConnectionState::Active(ActiveConnection {
            participant,
            buffer: UtteranceBuffer::for_duration(self.audio_format, self.utterance_duration),
        })
    }

    async fn on_active(
        &self,
        mut connection: ActiveConnection,
        frame: Option<Result<InboundFrame>>,
    ) -> ConnectionState {
        match frame {
            Some(Ok(InboundFrame::Binary(bytes))) => {
                debug!(
                    user_id = %connection.participant.id,
                    bytes = bytes.len(),
                    "Audio frame received"
                );
                if let Some(utterance) = connection.buffer.append(&bytes) {
                    let participant = &connection.participant;
                    let recognized = self
                        .recognition
                        .recognize(&utterance, &participant.lang)
                        .await;
                    if let Some(text) = recognized {
                        info!(user_id = %participant.id, "Recognized: {}", text);
                        self.broadcaster
                            .broadcast(&participant.id, &participant.lang, &text)
                            .await;
                    }
                }
                ConnectionState::Active(connection)
            }
            Some(Ok(InboundFrame::Text(_))) => {
                debug!(user_id = %connection.participant.id, "Ignoring text frame");
                ConnectionState::Active(connection)
            }
            Some(Ok(InboundFrame::Close)) | None => {
                info!(user_id = %connection.participant.id, "Participant disconnected");
                self.close(connection, CloseReason::Disconnected).await
            }
            Some(Err(e)) => {
                warn!(user_id = %connection.participant.id, "Connection error: {:#}", e);
                self.close(connection, CloseReason::TransportError).await
            }
        }
    }

    async fn close(&self, connection: ActiveConnection, reason: CloseReason) -> ConnectionState {
        let participant = connection.participant;
        if !self
            .registry
            .release(&participant.id, participant.connection())
            .await
        {
            debug!(
                user_id = %participant.id,
                "Registry entry already replaced by a newer connection"
            );
        }
        ConnectionState::Closed(reason)
    }

    fn generate_user_id(&self) -> String {
        format!("user_{}", self.next_user.fetch_add(1, Ordering::Relaxed))
    }
}

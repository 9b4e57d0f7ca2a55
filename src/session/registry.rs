use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::packet::DeliveryPacket;
use super::stats::ParticipantSummary;

/// Sending half of a participant's outbound queue
pub type Outbox = mpsc::Sender<DeliveryPacket>;

/// A connected participant as seen by the rest of the session
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: String,
    pub lang: String,
    outbox: Outbox,
    /// Identifies the connection that registered this entry
    connection: Uuid,
    joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(id: impl Into<String>, lang: impl Into<String>, outbox: Outbox) -> Self {
        Self {
            id: id.into(),
            lang: lang.into(),
            outbox,
            connection: Uuid::new_v4(),
            joined_at: Utc::now(),
        }
    }

    pub fn connection(&self) -> Uuid {
        self.connection
    }

    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    /// Queue a packet for this participant without waiting
    ///
    /// A full queue counts as a failed delivery so a stalled reader never holds
    /// up the speaker.
    pub fn deliver(&self, packet: DeliveryPacket) -> Result<()> {
        match self.outbox.try_send(packet) {
            Ok(()) => Ok(()),
            Err(TrySendError::Closed(_)) => Err(anyhow!("channel closed")),
            Err(TrySendError::Full(_)) => Err(anyhow!(
                "outbound queue full ({} packets)",
                self.outbox.max_capacity()
            )),
        }
    }

    pub fn summary(&self) -> ParticipantSummary {
        ParticipantSummary {
            user_id: self.id.clone(),
            lang: self.lang.clone(),
            joined_at: self.joined_at,
        }
    }
}

/// Shared table of connected participants (user_id → participant)
///
/// Cloning yields another handle to the same table. Readers get copies, so a
/// snapshot stays valid while other connections join and leave.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    participants: Arc<RwLock<HashMap<String, Participant>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant, replacing any entry with the same identity
    ///
    /// Returns the replaced entry. Its connection stays open; it is simply no
    /// longer reachable through the registry.
    pub async fn join(&self, participant: Participant) -> Option<Participant> {
        let mut participants = self.participants.write().await;
        let id = participant.id.clone();
        let lang = participant.lang.clone();
        let replaced = participants.insert(id.clone(), participant);

        info!(
            user_id = %id,
            lang = %lang,
            replaced = replaced.is_some(),
            "Participant joined | total: {}",
            participants.len()
        );

        replaced
    }

    /// Remove the participant with this identity; a no-op if absent
    pub async fn leave(&self, id: &str) -> Option<Participant> {
        let mut participants = self.participants.write().await;
        let removed = participants.remove(id);

        if removed.is_some() {
            info!(user_id = %id, "Participant left | total: {}", participants.len());
        }

        removed
    }

    /// Remove `id` only if it is still owned by `connection`
    ///
    /// A connection whose entry was taken over by a later join must not evict
    /// the newcomer when it closes.
    pub async fn release(&self, id: &str, connection: Uuid) -> bool {
        let mut participants = self.participants.write().await;

        match participants.get(id) {
            Some(current) if current.connection == connection => {
                participants.remove(id);
                info!(user_id = %id, "Participant left | total: {}", participants.len());
                true
            }
            _ => false,
        }
    }

    /// Copy of every registered participant, in no particular order
    pub async fn snapshot(&self) -> Vec<Participant> {
        let participants = self.participants.read().await;
        participants.values().cloned().collect()
    }

    pub async fn get(&self, id: &str) -> Option<Participant> {
        let participants = self.participants.read().await;
        participants.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.participants.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.participants.read().await.is_empty()
    }
}

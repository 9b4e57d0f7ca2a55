use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public view of a registered participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub user_id: String,
    pub lang: String,
    /// When this participant joined
    pub joined_at: DateTime<Utc>,
}

/// What one fan-out achieved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastReport {
    /// Participants other than the speaker at snapshot time
    pub recipients: usize,

    /// Subtitle packets accepted by recipients' channels
    pub subtitles_delivered: usize,

    /// Audio packets accepted by recipients' channels
    pub audio_delivered: usize,
}

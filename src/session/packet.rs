use serde::{Deserialize, Serialize};

/// First message on every connection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Caller-chosen identity (generated if absent)
    #[serde(default)]
    pub user_id: Option<String>,

    /// BCP-47-like language tag, e.g. "es-MX" (default applied if absent)
    #[serde(default)]
    pub lang: Option<String>,
}

impl JoinRequest {
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Identity, ignoring blank values
    pub fn user_id(&self) -> Option<&str> {
        non_blank(self.user_id.as_deref())
    }

    /// Language tag, ignoring blank values
    pub fn lang(&self) -> Option<&str> {
        non_blank(self.lang.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Subtitle for one utterance, localized for one recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtitle {
    /// Speaker identity
    pub from: String,
    /// Speaker language tag
    pub source_lang: String,
    pub text_original: String,
    pub text_translated: String,
}

/// Structured events sent as text frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Subtitle(Subtitle),
}

/// One delivery to a participant's outbound channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryPacket {
    Subtitle(Subtitle),
    /// Synthesized speech, sent as a binary frame
    Audio(Vec<u8>),
}

impl DeliveryPacket {
    pub fn kind(&self) -> &'static str {
        match self {
            DeliveryPacket::Subtitle(_) => "subtitle",
            DeliveryPacket::Audio(_) => "audio",
        }
    }
}

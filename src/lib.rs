pub mod audio;
pub mod capability;
pub mod config;
pub mod http;
pub mod pipeline;
pub mod session;

pub use audio::{AudioFormat, Utterance, UtteranceBuffer};
pub use capability::{
    Capabilities, CapabilityFactory, SpeechRecognizer, SpeechSynthesizer, Translator,
    VoiceSelection,
};
pub use config::Config;
pub use http::{create_router, AppState};
pub use pipeline::{LocalizationPipeline, Localized, RecognitionGateway};
pub use session::{
    BroadcastReport, Broadcaster, ConnectionHandler, DeliveryPacket, Participant,
    SessionRegistry, Subtitle,
};

use crate::capability::Capabilities;
use crate::config::Config;
use crate::pipeline::{LocalizationPipeline, RecognitionGateway};
use crate::session::{Broadcaster, ConnectionHandler, SessionRegistry};
use std::sync::Arc;

/// Shared application state for HTTP and WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    /// Connected participants (user_id → participant)
    pub registry: SessionRegistry,

    /// Lifecycle driver for `/conversation` sockets
    pub connections: Arc<ConnectionHandler>,

    /// Depth of each participant's outbound queue
    pub outbound_queue: usize,
}

impl AppState {
    /// Wire the relay together from configuration and capability clients
    pub fn new(config: &Config, capabilities: Capabilities) -> Self {
        let registry = SessionRegistry::new();
        let timeout = config.capabilities.timeout();

        let recognition = Arc::new(RecognitionGateway::new(capabilities.recognizer, timeout));
        let localization = Arc::new(LocalizationPipeline::new(
            capabilities.translator,
            capabilities.synthesizer,
            config.capabilities.voice_variant.clone(),
            timeout,
        ));
        let broadcaster = Arc::new(Broadcaster::new(registry.clone(), localization));
        let connections = Arc::new(ConnectionHandler::new(
            registry.clone(),
            recognition,
            broadcaster,
            config.relay.default_lang.clone(),
            config.audio.format(),
            config.audio.utterance_duration(),
        ));

        Self {
            registry,
            connections,
            outbound_queue: config.relay.outbound_queue.max(1),
        }
    }
}

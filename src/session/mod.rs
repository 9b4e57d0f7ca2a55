//! Multi-party session relay
//!
//! This module provides the pieces that connect participants to each other:
//! - `SessionRegistry` - shared table of connected participants
//! - `Broadcaster` - per-recipient localization and delivery of one utterance
//! - `ConnectionHandler` - per-connection join, audio, leave lifecycle
//! - Wire packets exchanged with clients

mod broadcaster;
mod connection;
mod packet;
mod registry;
mod stats;

pub use broadcaster::Broadcaster;
pub use connection::{CloseReason, ConnectionHandler, InboundFrame};
pub use packet::{DeliveryPacket, JoinRequest, ServerEvent, Subtitle};
pub use registry::{Outbox, Participant, SessionRegistry};
pub use stats::{BroadcastReport, ParticipantSummary};

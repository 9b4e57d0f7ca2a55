use super::state::AppState;
use crate::session::{DeliveryPacket, InboundFrame, ServerEvent};
use anyhow::Error;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// How long the writer may keep flushing after the connection loop ends
const WRITER_DRAIN: Duration = Duration::from_secs(1);

/// GET /conversation
/// WebSocket upgrade into a session participant
pub async fn conversation(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve_socket(socket, state))
}

async fn serve_socket(socket: WebSocket, state: AppState) {
    let (mut sink, stream) = socket.split();
    let (outbox, mut outbound_rx) = mpsc::channel::<DeliveryPacket>(state.outbound_queue);

    // Drain the participant's outbound queue onto the socket
    let mut writer = tokio::spawn(async move {
        while let Some(packet) = outbound_rx.recv().await {
            let Some(message) = to_message(packet) else {
                continue;
            };
            if let Err(e) = sink.send(message).await {
                debug!("Outbound socket closed: {}", e);
                break;
            }
        }
        let _ = sink.close().await;
    });

    let inbound = stream.filter_map(|message| async move {
        match message {
            Ok(Message::Text(text)) => Some(Ok(InboundFrame::Text(text))),
            Ok(Message::Binary(bytes)) => Some(Ok(InboundFrame::Binary(bytes))),
            Ok(Message::Close(_)) => Some(Ok(InboundFrame::Close)),
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => None,
            Err(e) => Some(Err(Error::from(e))),
        }
    });

    // `run` consumes the outbox and deregisters on return, so the writer sees
    // the queue close once any in-flight broadcast lets go of its copy
    let reason = state.connections.run(inbound, outbox).await;
    debug!("Connection closed: {:?}", reason);

    if tokio::time::timeout(WRITER_DRAIN, &mut writer).await.is_err() {
        debug!("Writer still busy after {:?}, aborting", WRITER_DRAIN);
        writer.abort();
    }
}

fn to_message(packet: DeliveryPacket) -> Option<Message> {
    match packet {
        DeliveryPacket::Subtitle(subtitle) => {
            match serde_json::to_string(&ServerEvent::Subtitle(subtitle)) {
                Ok(json) => Some(Message::Text(json)),
                Err(e) => {
                    warn!("Failed to encode subtitle: {}", e);
                    None
                }
            }
        }
        DeliveryPacket::Audio(bytes) => Some(Message::Binary(bytes)),
    }
}

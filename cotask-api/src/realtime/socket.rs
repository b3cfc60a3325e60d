/// WebSocket endpoint and per-connection loop
///
/// Each accepted socket is admitted to the registry, subscribed to the
/// broadcast stream, and given a direct channel for targeted events. The
/// loop multiplexes three sources: inbound client frames, the direct
/// channel, and the broadcast stream. On exit the connection is removed
/// from the registry.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::{broadcast, mpsc};

use crate::app::AppState;
use crate::realtime::events::{ClientEvent, ServerEvent};
use crate::realtime::registry::ConnectionId;

/// Capacity of the per-connection direct channel
const DIRECT_CHANNEL_CAPACITY: usize = 32;

/// Handles `GET /ws` upgrade requests
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (direct_tx, mut direct_rx) = mpsc::channel::<ServerEvent>(DIRECT_CHANNEL_CAPACITY);
    let connection_id = state.registry.connect(direct_tx).await;
    let mut broadcast_rx = state.events.subscribe();

    let (mut sink, mut stream) = socket.split();

    tracing::info!(%connection_id, "WebSocket connected");

    loop {
        tokio::select! {
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_message(&state, connection_id, &text).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    // Ping/pong handled by axum; binary frames ignored
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(%connection_id, "WebSocket read error: {}", e);
                        break;
                    }
                }
            }
            event = direct_rx.recv() => {
                match event {
                    Some(event) => {
                        if !send_event(&mut sink, connection_id, &event).await {
                            break;
                        }
                    }
                    None => break,
                }
            }
            result = broadcast_rx.recv() => {
                match result {
                    Ok(event) => {
                        if !send_event(&mut sink, connection_id, &event).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(%connection_id, missed, "Slow WebSocket consumer, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    state.registry.unregister(connection_id).await;
    tracing::info!(%connection_id, "WebSocket disconnected");
}

async fn handle_client_message(state: &AppState, connection_id: ConnectionId, text: &str) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::Register(user_id)) => {
            state.registry.register(user_id, connection_id).await;
            tracing::info!(%user_id, %connection_id, "User registered for real-time events");
        }
        Err(e) => {
            // Unknown or malformed frames are ignored, not fatal
            tracing::debug!(%connection_id, "Ignoring unrecognized client frame: {}", e);
        }
    }
}

/// Serializes and sends one event; returns false when the socket is gone
async fn send_event(
    sink: &mut SplitSink<WebSocket, Message>,
    connection_id: ConnectionId,
    event: &ServerEvent,
) -> bool {
    let json = match serde_json::to_string(event) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(%connection_id, "Failed to serialize event: {}", e);
            return true;
        }
    };

    if let Err(e) = sink.send(Message::Text(json)).await {
        tracing::debug!(%connection_id, "WebSocket write failed: {}", e);
        return false;
    }

    true
}

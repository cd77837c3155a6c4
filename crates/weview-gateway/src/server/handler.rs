//! WebSocket handler
//!
//! Handles WebSocket connections and client frames. A connection is
//! subscribed to its user's topic until it closes; closing never touches the
//! user's presence record.

use std::time::Duration;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;
use weview_core::{Topic, Username};

use crate::handlers::FrameDispatcher;
use crate::protocol::{CloseCode, ErrorFrame};
use crate::server::GatewayState;

/// Channel buffer size for replies (error and close frames)
const REPLY_BUFFER_SIZE: usize = 16;

/// How long the writer gets to flush a close frame
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// WebSocket gateway handler for `/ws/{username}`
pub async fn ws_handler(
    Path(username): Path<String>,
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> Response {
    let owner = match Username::parse(username) {
        Ok(owner) => owner,
        Err(e) => {
            let body = ErrorFrame::new("VALIDATION_ERROR", format!("Invalid username: {e}"));
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(state, owner, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, owner: Username, socket: WebSocket) {
    let connection_id = Uuid::new_v4();
    let topic = Topic::user(&owner);

    let subscription = state.registry().subscribe(&topic);
    let subscriber_id = subscription.id;
    if subscription.first_on_topic {
        watch_topic(&state, &topic).await;
    }

    tracing::info!(
        connection_id = %connection_id,
        username = %owner,
        "WebSocket connection established"
    );

    let (mut ws_sink, mut ws_stream) = socket.split();
    let (reply_tx, mut reply_rx) = mpsc::channel::<Message>(REPLY_BUFFER_SIZE);
    let close_tx = reply_tx.clone();
    let mut events = subscription.receiver;

    // Writer: relay events and replies to the socket
    let mut send_task = tokio::spawn(async move {
        loop {
            let message = tokio::select! {
                Some(payload) = events.recv() => Message::Text(payload.into()),
                Some(reply) = reply_rx.recv() => reply,
                else => break,
            };

            let closing = matches!(message, Message::Close(_));
            if ws_sink.send(message).await.is_err() {
                tracing::warn!(connection_id = %connection_id, "Failed to send message to WebSocket");
                break;
            }
            if closing {
                break;
            }
        }

        let _ = ws_sink.close().await;
    });

    // Reader: client frames to relay operations
    let state_recv = state.clone();
    let owner_recv = owner.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    let Err(e) =
                        FrameDispatcher::dispatch_text(&state_recv, owner_recv.as_str(), &text).await
                    else {
                        continue;
                    };

                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        "Client frame rejected"
                    );
                    if let Ok(json) = e.to_frame().to_json() {
                        let _ = reply_tx.send(Message::Text(json.into())).await;
                    }
                    if let Some(close_code) = e.to_close_code() {
                        return Some(close_code);
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(connection_id = %connection_id, "Binary frames not supported");
                    return Some(CloseCode::DecodeError);
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // pong is handled automatically by axum
                    tracing::trace!(connection_id = %connection_id, "Ping/Pong received");
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(connection_id = %connection_id, "Client closed connection");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(connection_id = %connection_id, error = %e, "WebSocket error");
                    return None;
                }
            }
        }
        None
    });

    tokio::select! {
        result = &mut recv_task => {
            if let Ok(Some(close_code)) = result {
                tracing::debug!(connection_id = %connection_id, close_code = %close_code, "Closing connection");
                let _ = close_tx.send(close_message(close_code)).await;
                let _ = tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut send_task).await;
            }
            send_task.abort();
        }
        _ = &mut send_task => {
            tracing::debug!(connection_id = %connection_id, "Send task ended");
            recv_task.abort();
        }
    }

    cleanup_connection(&state, &topic, subscriber_id).await;
    tracing::info!(connection_id = %connection_id, username = %owner, "WebSocket connection closed");
}

fn close_message(code: CloseCode) -> Message {
    Message::Close(Some(CloseFrame {
        code: code.as_u16(),
        reason: code.reason().into(),
    }))
}

async fn watch_topic(state: &GatewayState, topic: &Topic) {
    if let Some(dispatcher) = state.dispatcher() {
        if let Err(e) = dispatcher.watch(topic).await {
            tracing::error!(topic = %topic, error = %e, "Failed to watch topic on the bus");
        }
    }
}

/// Drop the subscription; stop watching the bus topic once nobody listens
async fn cleanup_connection(state: &GatewayState, topic: &Topic, subscriber_id: u64) {
    if !state.registry().unsubscribe(topic, subscriber_id) {
        return;
    }
    tracing::debug!(
        topic = %topic,
        active_topics = state.registry().topic_count(),
        "Last subscriber left topic"
    );

    if let Some(dispatcher) = state.dispatcher() {
        if let Err(e) = dispatcher.unwatch(topic).await {
            tracing::warn!(topic = %topic, error = %e, "Failed to unwatch topic on the bus");
        }
        // a connection may have arrived while unwatching
        if state.registry().subscriber_count(topic) > 0 {
            watch_topic(state, topic).await;
        }
    }
}

//! WebSocket upgrade handler.
//!
//! Connections are admitted unauthenticated; the client binds identity
//! with an in-band `auth` message. Each connection gets one dedicated
//! writer task draining its bounded outbound queue, so a slow reader can
//! never stall the dispatch loop.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use classpulse_realtime::message::types::OutboundFrame;

use crate::state::AppState;

/// GET /ws — WebSocket upgrade.
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket))
}

/// Drives an established WebSocket connection.
async fn handle_ws_connection(state: AppState, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state.hub.registry().register();
    let conn_id = handle.id;

    info!(conn_id = %conn_id, "WebSocket connection established");

    // Dedicated writer: the only task touching the sink.
    let writer_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            let message = match frame {
                OutboundFrame::Event(text) => Message::Text(text.into()),
                OutboundFrame::Ping => Message::Ping(Bytes::new()),
                OutboundFrame::Close => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            };
            if ws_tx.send(message).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                state.hub.handle_inbound(&conn_id, text.as_str());
            }
            Ok(Message::Pong(_)) => {
                state.hub.registry().mark_alive(&conn_id);
            }
            Ok(Message::Close(_)) => {
                debug!(conn_id = %conn_id, "Client closed connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    writer_task.abort();
    state.hub.registry().unregister(&conn_id);

    info!(conn_id = %conn_id, "WebSocket connection closed");
}

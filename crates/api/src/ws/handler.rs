use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use euit_core::protocol::ClientCommand;
use euit_core::types::ConnectionId;
use euit_events::{Outbound, TransportHub};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::state::AppState;

/// Close code sent when the server is going away.
const CLOSE_GOING_AWAY: u16 = 1001;

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with the hub and driven
/// by a writer task plus the receive loop below.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let client_timeout = state.config.client_timeout();
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub, client_timeout))
}

/// Manage a single WebSocket connection after upgrade.
///
///   1. Registers the connection with the hub (`Connected`).
///   2. Spawns a writer task draining the connection's outbound queue.
///   3. Applies inbound subscribe/unsubscribe commands until the client
///      leaves, errors, or stays silent longer than `client_timeout`.
///   4. Disconnects, which drops every group membership.
async fn handle_socket(socket: WebSocket, hub: Arc<TransportHub>, client_timeout: Duration) {
    let (conn_id, rx) = hub.connect().await;
    let (sink, mut stream) = socket.split();
    let send_task = tokio::spawn(write_outbound(conn_id, sink, rx));

    loop {
        let next = match tokio::time::timeout(client_timeout, stream.next()).await {
            Ok(Some(result)) => result,
            Ok(None) => break,
            Err(_) => {
                tracing::info!(conn_id = %conn_id, "Client idle timeout, closing");
                break;
            }
        };

        match next {
            Ok(Message::Text(text)) => handle_text(&hub, conn_id, text.as_str()).await,
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Binary(_)) => {
                hub.reject(conn_id, "Binary frames are not supported").await;
            }
            Ok(Message::Ping(_)) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    hub.disconnect(conn_id).await;
    send_task.abort();
}

async fn handle_text(hub: &TransportHub, conn_id: ConnectionId, text: &str) {
    let command = match ClientCommand::parse(text) {
        Ok(command) => command,
        Err(e) => {
            tracing::debug!(conn_id = %conn_id, error = %e, "Malformed client frame");
            hub.reject(conn_id, format!("Invalid message: {e}")).await;
            return;
        }
    };

    if let Err(e) = hub.handle(conn_id, command).await {
        tracing::debug!(conn_id = %conn_id, error = %e, "Client command rejected");
        hub.reject(conn_id, e.to_string()).await;
    }
}

/// Forward queued frames to the socket until the queue closes or the peer
/// goes away.
async fn write_outbound<S>(conn_id: ConnectionId, mut sink: S, mut rx: mpsc::Receiver<Outbound>)
where
    S: futures::Sink<Message> + Unpin,
{
    while let Some(outbound) = rx.recv().await {
        let message = match outbound {
            Outbound::Text(text) => Message::Text(Utf8Bytes::from(text.to_string())),
            Outbound::Ping => Message::Ping(Default::default()),
            Outbound::Close => {
                let _ = sink
                    .send(Message::Close(Some(CloseFrame {
                        code: CLOSE_GOING_AWAY,
                        reason: Utf8Bytes::from_static("server shutting down"),
                    })))
                    .await;
                break;
            }
        };

        if sink.send(message).await.is_err() {
            tracing::debug!(conn_id = %conn_id, "WebSocket sink closed");
            break;
        }
    }
}

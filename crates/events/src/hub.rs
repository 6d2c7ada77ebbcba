//! Connection lifecycle and per-connection fan-out.
//!
//! Each connection moves through `Connected` → (`Subscribed` to zero or more
//! groups) → `Disconnected`. The hub owns the outbound queue of every live
//! connection and mutates the shared [`ConnectionRegistry`] as clients
//! subscribe, unsubscribe and go away.
//!
//! Lock order is always `connections` before the registry; delivery takes
//! them one after the other and never holds either across a send.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use euit_core::protocol::{
    ClientCommand, ProtocolError, SubscribedAck, UnsubscribedAck, EVENT_ERROR, EVENT_SUBSCRIBED,
    EVENT_UNSUBSCRIBED, SUBSCRIBED_MESSAGE,
};
use euit_core::types::{ConnectionId, Timestamp};
use futures::future::join_all;
use tokio::sync::{mpsc, RwLock};

use crate::channel::{DeliveryReport, GroupChannel, Outbound, OutboundFrame};
use crate::error::HubError;
use crate::registry::ConnectionRegistry;

/// Default per-connection send timeout.
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Default capacity of each connection's outbound queue.
const DEFAULT_OUTBOUND_BUFFER: usize = 64;

/// Tuning knobs for [`TransportHub`].
#[derive(Debug, Clone, Copy)]
pub struct HubOptions {
    /// How long a single send may wait for queue space before the
    /// connection is counted as failed for that frame.
    pub send_timeout: Duration,
    /// Capacity of each connection's outbound queue.
    pub outbound_buffer: usize,
}

impl Default for HubOptions {
    fn default() -> Self {
        Self {
            send_timeout: DEFAULT_SEND_TIMEOUT,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

/// A live connection's outbound side.
struct ConnectionHandle {
    sender: mpsc::Sender<Outbound>,
    connected_at: Timestamp,
}

/// Owns every live connection and applies client commands to the registry.
///
/// Designed to be wrapped in `Arc` and shared across the application.
pub struct TransportHub {
    registry: Arc<ConnectionRegistry>,
    connections: RwLock<HashMap<ConnectionId, ConnectionHandle>>,
    options: HubOptions,
}

impl TransportHub {
    pub fn new(registry: Arc<ConnectionRegistry>, options: HubOptions) -> Self {
        Self {
            registry,
            connections: RwLock::new(HashMap::new()),
            options,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Register a freshly accepted connection (`Connected` state).
    ///
    /// Returns the connection id and the receiver the transport writer task
    /// drains into the socket. No group membership is created yet.
    pub async fn connect(&self) -> (ConnectionId, mpsc::Receiver<Outbound>) {
        let conn_id = uuid::Uuid::new_v4();
        let (sender, receiver) = mpsc::channel(self.options.outbound_buffer.max(1));
        let handle = ConnectionHandle {
            sender,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, handle);
        tracing::info!(conn_id = %conn_id, "Client connected");
        (conn_id, receiver)
    }

    /// Apply a decoded client command on behalf of `conn_id`.
    pub async fn handle(&self, conn_id: ConnectionId, command: ClientCommand) -> Result<(), HubError> {
        match command {
            ClientCommand::Subscribe { subscriber_id } => self.subscribe(conn_id, &subscriber_id).await,
            ClientCommand::Unsubscribe { subscriber_id } => {
                self.unsubscribe(conn_id, &subscriber_id).await
            }
        }
    }

    /// Join `subscriber_id`'s group and acknowledge to the caller only.
    ///
    /// Subscribing twice to the same id is idempotent.
    pub async fn subscribe(&self, conn_id: ConnectionId, subscriber_id: &str) -> Result<(), HubError> {
        let subscriber_id = validate_subscriber(subscriber_id)?;

        {
            // Held across the registry write so a concurrent disconnect
            // cannot slip in between and leave a dangling membership.
            let connections = self.connections.read().await;
            if !connections.contains_key(&conn_id) {
                return Err(HubError::UnknownConnection(conn_id));
            }
            self.registry.add(subscriber_id, conn_id).await;
        }
        tracing::info!(conn_id = %conn_id, subscriber_id, "Subscriber joined");

        let ack = SubscribedAck {
            subscriber_id: subscriber_id.to_string(),
            message: SUBSCRIBED_MESSAGE.to_string(),
            timestamp: chrono::Utc::now(),
        };
        self.send_to_caller(conn_id, OutboundFrame::encode(EVENT_SUBSCRIBED, &ack)?)
            .await;
        Ok(())
    }

    /// Leave `subscriber_id`'s group and acknowledge to the caller only.
    ///
    /// Leaving a group the connection never joined still acknowledges.
    pub async fn unsubscribe(&self, conn_id: ConnectionId, subscriber_id: &str) -> Result<(), HubError> {
        let subscriber_id = validate_subscriber(subscriber_id)?;

        if !self.is_connected(conn_id).await {
            return Err(HubError::UnknownConnection(conn_id));
        }
        let removed = self.registry.remove_membership(subscriber_id, conn_id).await;
        tracing::info!(conn_id = %conn_id, subscriber_id, removed, "Subscriber left");

        let ack = UnsubscribedAck {
            subscriber_id: subscriber_id.to_string(),
            timestamp: chrono::Utc::now(),
        };
        self.send_to_caller(conn_id, OutboundFrame::encode(EVENT_UNSUBSCRIBED, &ack)?)
            .await;
        Ok(())
    }

    /// Tell the caller its last frame could not be processed.
    pub async fn reject(&self, conn_id: ConnectionId, message: impl Into<String>) {
        let error = ProtocolError {
            message: message.into(),
        };
        match OutboundFrame::encode(EVENT_ERROR, &error) {
            Ok(frame) => self.send_to_caller(conn_id, frame).await,
            Err(e) => tracing::error!(conn_id = %conn_id, error = %e, "Failed to encode error frame"),
        }
    }

    /// Terminal transition: drop the connection and every membership it had.
    ///
    /// Safe to call more than once.
    pub async fn disconnect(&self, conn_id: ConnectionId) {
        let mut connections = self.connections.write().await;
        let handle = connections.remove(&conn_id);
        let left = self.registry.remove(conn_id).await;
        drop(connections);

        if let Some(handle) = handle {
            let session_secs = (chrono::Utc::now() - handle.connected_at).num_seconds();
            tracing::info!(
                conn_id = %conn_id,
                groups = left.len(),
                session_secs,
                "Client disconnected"
            );
        }
    }

    pub async fn is_connected(&self, conn_id: ConnectionId) -> bool {
        self.connections.read().await.contains_key(&conn_id)
    }

    /// Return the current number of live connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Queue a Ping to every live connection.
    ///
    /// Full queues are skipped; a client that far behind will hit the idle
    /// timeout on its own.
    pub async fn ping_all(&self) {
        let connections = self.connections.read().await;
        for handle in connections.values() {
            let _ = handle.sender.try_send(Outbound::Ping);
        }
    }

    /// Send Close to every connection, then forget them all.
    ///
    /// Used during graceful shutdown.
    pub async fn shutdown_all(&self) {
        let mut connections = self.connections.write().await;
        let count = connections.len();
        for (conn_id, handle) in connections.drain() {
            let _ = handle.sender.try_send(Outbound::Close);
            self.registry.remove(conn_id).await;
        }
        tracing::info!(count, "Closed all hub connections");
    }

    /// Best-effort reply to a single connection.
    async fn send_to_caller(&self, conn_id: ConnectionId, frame: OutboundFrame) {
        let sender = self
            .connections
            .read()
            .await
            .get(&conn_id)
            .map(|handle| handle.sender.clone());

        match sender {
            Some(sender) => {
                self.fan_out(vec![(conn_id, sender)], &frame, None).await;
            }
            None => {
                tracing::debug!(conn_id = %conn_id, event = %frame.event, "Reply target already gone");
            }
        }
    }

    /// Resolve connection ids to their outbound senders, skipping any that
    /// disconnected since the membership snapshot was taken.
    async fn senders_for(&self, conn_ids: &[ConnectionId]) -> Vec<(ConnectionId, mpsc::Sender<Outbound>)> {
        let connections = self.connections.read().await;
        conn_ids
            .iter()
            .filter_map(|id| connections.get(id).map(|h| (*id, h.sender.clone())))
            .collect()
    }

    /// Send `frame` to every target concurrently, each bounded by the send
    /// timeout, and wait for all of them.
    async fn fan_out(
        &self,
        targets: Vec<(ConnectionId, mpsc::Sender<Outbound>)>,
        frame: &OutboundFrame,
        subscriber_id: Option<&str>,
    ) -> DeliveryReport {
        let timeout = self.options.send_timeout;
        let sends = targets.into_iter().map(|(conn_id, sender)| {
            let message = Outbound::Text(Arc::clone(&frame.text));
            async move {
                match sender.send_timeout(message, timeout).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(
                            conn_id = %conn_id,
                            subscriber_id = subscriber_id.unwrap_or("*"),
                            event = %frame.event,
                            error = %e,
                            "Failed to deliver frame to connection"
                        );
                        false
                    }
                }
            }
        });

        let results = join_all(sends).await;
        let delivered = results.iter().filter(|ok| **ok).count();
        DeliveryReport {
            attempted: results.len(),
            delivered,
            failed: results.len() - delivered,
        }
    }
}

#[async_trait]
impl GroupChannel for TransportHub {
    async fn deliver_to(&self, subscriber_id: &str, frame: OutboundFrame) -> DeliveryReport {
        let members = self.registry.members(subscriber_id).await;
        if members.is_empty() {
            tracing::debug!(subscriber_id, event = %frame.event, "No live connections for subscriber");
            return DeliveryReport::default();
        }

        let targets = self.senders_for(&members).await;
        let report = self.fan_out(targets, &frame, Some(subscriber_id)).await;
        tracing::debug!(
            subscriber_id,
            event = %frame.event,
            delivered = report.delivered,
            failed = report.failed,
            "Group delivery finished"
        );
        report
    }

    async fn deliver_all(&self, frame: OutboundFrame) -> DeliveryReport {
        let targets: Vec<_> = self
            .connections
            .read()
            .await
            .iter()
            .map(|(id, h)| (*id, h.sender.clone()))
            .collect();

        let report = self.fan_out(targets, &frame, None).await;
        tracing::debug!(
            event = %frame.event,
            delivered = report.delivered,
            failed = report.failed,
            "Broadcast delivery finished"
        );
        report
    }
}

fn validate_subscriber(subscriber_id: &str) -> Result<&str, HubError> {
    let trimmed = subscriber_id.trim();
    if trimmed.is_empty() {
        return Err(HubError::InvalidSubscriber);
    }
    Ok(trimmed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

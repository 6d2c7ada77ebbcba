//! The delivery seam between the dispatcher and the transport.

use std::sync::Arc;

use async_trait::async_trait;
use euit_core::protocol::ServerFrame;
use serde::Serialize;

/// Message queued for a single connection's writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A JSON text frame.
    Text(Arc<str>),
    /// Keep-alive ping.
    Ping,
    /// Close the socket; nothing follows.
    Close,
}

/// A server frame encoded once and shared by every recipient.
#[derive(Debug, Clone)]
pub struct OutboundFrame {
    pub event: Arc<str>,
    pub text: Arc<str>,
}

impl OutboundFrame {
    pub fn encode<T: Serialize + ?Sized>(event: &str, data: &T) -> Result<Self, serde_json::Error> {
        let text = ServerFrame::new(event, data).encode()?;
        Ok(Self {
            event: Arc::from(event),
            text: Arc::from(text),
        })
    }
}

/// Outcome of one group (or broadcast) delivery.
///
/// Counts are per connection. `attempted == delivered + failed` always
/// holds; an empty group yields the zero report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

impl DeliveryReport {
    pub fn merge(self, other: DeliveryReport) -> DeliveryReport {
        DeliveryReport {
            attempted: self.attempted + other.attempted,
            delivered: self.delivered + other.delivered,
            failed: self.failed + other.failed,
        }
    }
}

/// Addressable delivery targets.
///
/// Implementations send to the membership observed at call time; connections
/// joining afterwards do not receive the frame. Per-connection failures are
/// logged and counted, never returned.
#[async_trait]
pub trait GroupChannel: Send + Sync {
    /// Deliver to every connection in `subscriber_id`'s group.
    async fn deliver_to(&self, subscriber_id: &str, frame: OutboundFrame) -> DeliveryReport;

    /// Deliver to every live connection, subscribed or not.
    async fn deliver_all(&self, frame: OutboundFrame) -> DeliveryReport;
}

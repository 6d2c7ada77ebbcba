//! Hub wire protocol.
//!
//! Clients send [`ClientCommand`] JSON text frames; the server answers and
//! pushes [`ServerFrame`]s of the form `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::types::{SubscriberId, Timestamp};

/// Path the WebSocket hub is mounted at.
pub const HUB_PATH: &str = "/notifications";

/// Acknowledgement of a `subscribe` command (caller only).
pub const EVENT_SUBSCRIBED: &str = "Subscribed";
/// Acknowledgement of an `unsubscribe` command (caller only).
pub const EVENT_UNSUBSCRIBED: &str = "Unsubscribed";
/// Reply to a frame the hub could not act on (caller only).
pub const EVENT_ERROR: &str = "Error";

/// Confirmation text sent with every `Subscribed` frame.
pub const SUBSCRIBED_MESSAGE: &str = "Đã đăng ký nhận thông báo";

/// Operations a connected client may invoke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientCommand {
    Subscribe {
        #[serde(rename = "subscriberId")]
        subscriber_id: SubscriberId,
    },
    Unsubscribe {
        #[serde(rename = "subscriberId")]
        subscriber_id: SubscriberId,
    },
}

impl ClientCommand {
    /// Decode a text frame received from a client.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn subscriber_id(&self) -> &str {
        match self {
            ClientCommand::Subscribe { subscriber_id }
            | ClientCommand::Unsubscribe { subscriber_id } => subscriber_id,
        }
    }
}

/// A server-to-client push.
#[derive(Debug, Serialize)]
pub struct ServerFrame<'a, T: Serialize + ?Sized> {
    pub event: &'a str,
    pub data: &'a T,
}

impl<'a, T: Serialize + ?Sized> ServerFrame<'a, T> {
    pub fn new(event: &'a str, data: &'a T) -> Self {
        Self { event, data }
    }

    /// Serialize to the JSON text sent over the wire.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedAck {
    pub subscriber_id: SubscriberId,
    pub message: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribedAck {
    pub subscriber_id: SubscriberId,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolError {
    pub message: String,
}

use euit_core::types::ConnectionId;

/// Errors raised by [`TransportHub`](crate::TransportHub) operations.
///
/// None of these are fatal to the hub; the caller reports them back to the
/// offending connection and keeps serving.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("Unknown connection: {0}")]
    UnknownConnection(ConnectionId),

    #[error("Subscriber id must not be empty")]
    InvalidSubscriber,

    #[error("Failed to encode frame: {0}")]
    Serialization(#[from] serde_json::Error),
}

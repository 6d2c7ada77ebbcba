//! eUIT real-time notification fan-out.
//!
//! This crate holds the transport-agnostic core of the notification server:
//!
//! - [`ConnectionRegistry`]: subscriber → live connection memberships and
//!   presence queries.
//! - [`GroupChannel`]: delivery seam for "send this frame to every
//!   connection of subscriber X" or to every live connection.
//! - [`TransportHub`]: the per-connection state machine
//!   (connect → subscribe/unsubscribe → disconnect) and the concurrent,
//!   timeout-bounded per-connection fan-out.
//! - [`NotificationDispatcher`]: typed publish operations that build the
//!   envelope and hand it to the channel.
//!
//! The WebSocket adapter lives in the API crate; it only moves
//! [`Outbound`] messages to the socket and feeds decoded commands back in.

pub mod channel;
pub mod dispatcher;
pub mod error;
pub mod hub;
pub mod registry;

pub use channel::{DeliveryReport, GroupChannel, Outbound, OutboundFrame};
pub use dispatcher::NotificationDispatcher;
pub use error::HubError;
pub use hub::{HubOptions, TransportHub};
pub use registry::ConnectionRegistry;

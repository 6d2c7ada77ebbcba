//! Shared domain types for the eUIT notification server.
//!
//! - [`notification`]: typed payloads, the [`NotificationEvent`] union and
//!   the [`Envelope`] every pushed event is wrapped in.
//! - [`protocol`]: the hub wire format spoken over the WebSocket.
//! - [`ingress`]: HTTP bodies exchanged with the backend.
//! - [`error`]: the domain error type shared by the other crates.

pub mod dates;
pub mod error;
pub mod ingress;
pub mod notification;
pub mod protocol;
pub mod types;

pub use notification::{
    ClassCancellation, Envelope, GradeUpdate, MakeupClass, NotificationEvent, NotificationKind,
    TrainingScore,
};
pub use protocol::{ClientCommand, ServerFrame};

//! WebSocket transport for the notification hub.
//!
//! Provides the HTTP upgrade handler mounted at `/notifications` and the
//! keep-alive task that pings every live connection.

mod handler;
mod heartbeat;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;

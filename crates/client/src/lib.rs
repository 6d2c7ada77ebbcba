//! Backend-side HTTP client for the eUIT notification server.
//!
//! Other backend services use [`NotificationClient`] to publish typed
//! notifications instead of hand-building ingress requests.

pub mod client;
pub mod config;

pub use client::{ClientError, NotificationClient};
pub use config::ClientConfig;

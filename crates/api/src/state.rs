use std::sync::Arc;

use euit_events::{ConnectionRegistry, NotificationDispatcher, TransportHub};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Subscriber → connection memberships; answers presence queries.
    pub registry: Arc<ConnectionRegistry>,
    /// Live connections and their lifecycle.
    pub hub: Arc<TransportHub>,
    /// Typed publish operations over the hub.
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl AppState {
    /// Wire one registry, hub and dispatcher together for this process.
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let hub = Arc::new(TransportHub::new(
            Arc::clone(&registry),
            config.hub_options(),
        ));
        let dispatcher = Arc::new(NotificationDispatcher::new(hub.clone()));

        Self {
            config: Arc::new(config),
            registry,
            hub,
            dispatcher,
        }
    }
}

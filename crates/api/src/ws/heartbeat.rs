use std::sync::Arc;
use std::time::Duration;

use euit_events::TransportHub;
use tokio_util::sync::CancellationToken;

/// Spawn a background task that sends periodic Ping frames to all connected
/// WebSocket clients.
///
/// Runs until `cancel` fires. Clients answer with Pong, which counts as
/// inbound traffic for the idle timeout.
pub fn start_heartbeat(
    hub: Arc<TransportHub>,
    interval: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("Heartbeat stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let count = hub.connection_count().await;
                    tracing::debug!(count, "WebSocket heartbeat ping");
                    hub.ping_all().await;
                }
            }
        }
    })
}

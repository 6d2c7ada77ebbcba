//! Lifecycle tests driving `TransportHub` through its public API only, the
//! way a transport adapter would.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use euit_core::protocol::ClientCommand;
use euit_events::{
    ConnectionRegistry, GroupChannel, HubError, HubOptions, NotificationDispatcher, Outbound,
    OutboundFrame, TransportHub,
};

fn hub() -> Arc<TransportHub> {
    Arc::new(TransportHub::new(
        Arc::new(ConnectionRegistry::new()),
        HubOptions::default(),
    ))
}

// ---------------------------------------------------------------------------
// Test: racing subscribe against disconnect never leaks a membership
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_subscribe_and_disconnect_leave_registry_empty() {
    let hub = hub();
    let mut tasks = Vec::new();

    for i in 0..200 {
        let hub = Arc::clone(&hub);
        tasks.push(tokio::spawn(async move {
            let (conn, _rx) = hub.connect().await;
            let subscriber = format!("S{}", i % 10);
            let subscribe = {
                let hub = Arc::clone(&hub);
                let subscriber = subscriber.clone();
                tokio::spawn(async move { hub.subscribe(conn, &subscriber).await })
            };
            hub.disconnect(conn).await;
            // Either the subscribe won or it saw the connection already gone.
            let result = subscribe.await.unwrap();
            assert!(matches!(result, Ok(()) | Err(HubError::UnknownConnection(_))));
            hub.disconnect(conn).await;
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let registry = hub.registry();
    assert_eq!(hub.connection_count().await, 0);
    assert_eq!(registry.online_subscriber_count().await, 0);
    for i in 0..10 {
        assert!(!registry.is_online(&format!("S{i}")).await);
    }
}

// ---------------------------------------------------------------------------
// Test: commands decoded from text drive the state machine
// ---------------------------------------------------------------------------

#[tokio::test]
async fn decoded_commands_subscribe_and_unsubscribe() {
    let hub = hub();
    let (conn, mut rx) = hub.connect().await;

    let subscribe = ClientCommand::parse(r#"{"type":"subscribe","subscriberId":"A"}"#).unwrap();
    hub.handle(conn, subscribe).await.unwrap();
    assert_matches!(rx.recv().await, Some(Outbound::Text(text)) if text.contains("Subscribed"));
    assert!(hub.registry().is_online("A").await);

    let unsubscribe = ClientCommand::parse(r#"{"type":"unsubscribe","subscriberId":"A"}"#).unwrap();
    hub.handle(conn, unsubscribe).await.unwrap();
    assert_matches!(rx.recv().await, Some(Outbound::Text(text)) if text.contains("Unsubscribed"));
    assert!(!hub.registry().is_online("A").await);
}

// ---------------------------------------------------------------------------
// Test: a stalled client cannot hold up delivery to others
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stalled_connection_times_out_without_blocking_peers() {
    let hub = Arc::new(TransportHub::new(
        Arc::new(ConnectionRegistry::new()),
        HubOptions {
            send_timeout: Duration::from_millis(50),
            outbound_buffer: 1,
        },
    ));
    let (stalled, _stalled_rx) = hub.connect().await;
    let (healthy, mut healthy_rx) = hub.connect().await;
    // The stalled queue fills with its own ack and is never drained.
    hub.subscribe(stalled, "A").await.unwrap();
    hub.subscribe(healthy, "A").await.unwrap();
    healthy_rx.recv().await.unwrap();

    let frame = OutboundFrame::encode("Custom", &serde_json::json!({"n": 1})).unwrap();
    let report = tokio::time::timeout(Duration::from_secs(2), hub.deliver_to("A", frame))
        .await
        .expect("fan-out must finish within the send timeout");

    assert_eq!(report.attempted, 2);
    assert_eq!(report.delivered, 1);
    assert_eq!(report.failed, 1);
    assert_matches!(healthy_rx.recv().await, Some(Outbound::Text(_)));
}

// ---------------------------------------------------------------------------
// Test: shutdown closes every connection and clears presence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_all_sends_close_and_clears_registry() {
    let hub = hub();
    let dispatcher = NotificationDispatcher::new(hub.clone());
    let (conn, mut rx) = hub.connect().await;
    hub.subscribe(conn, "A").await.unwrap();
    rx.recv().await.unwrap();

    hub.shutdown_all().await;

    assert_eq!(rx.recv().await, Some(Outbound::Close));
    assert_eq!(hub.connection_count().await, 0);
    assert!(!hub.registry().is_online("A").await);

    let report = dispatcher.broadcast("t", "m", None).await;
    assert_eq!(report.attempted, 0);
}

//! Typed publish operations.
//!
//! [`NotificationDispatcher`] turns a publish request into one or more
//! [`GroupChannel`] deliveries. Delivery is best-effort: failures are
//! counted in the returned [`DeliveryReport`] and logged by the channel,
//! never surfaced as errors.

use std::sync::Arc;

use chrono::Utc;
use euit_core::notification::{
    ClassCancellation, Envelope, GradeUpdate, MakeupClass, NotificationEvent, TrainingScore,
    EVENT_BROADCAST,
};
use euit_core::types::SubscriberId;
use futures::future::join_all;
use serde::Serialize;

use crate::channel::{DeliveryReport, GroupChannel, OutboundFrame};

/// Publishes notifications to subscriber groups or to every connection.
///
/// Cheap to share behind `Arc`; holds only the delivery channel.
pub struct NotificationDispatcher {
    channel: Arc<dyn GroupChannel>,
}

impl NotificationDispatcher {
    pub fn new(channel: Arc<dyn GroupChannel>) -> Self {
        Self { channel }
    }

    /// Wrap a typed event in its envelope and deliver it to the subscriber's
    /// group.
    pub async fn publish(&self, subscriber_id: &str, event: NotificationEvent) -> DeliveryReport {
        let event_name = event.event_name();
        tracing::info!(
            subscriber_id,
            event = event_name,
            summary = event.summary(),
            "Publishing notification"
        );

        let envelope = Envelope::for_event(event, Utc::now());
        match encode(event_name, &envelope) {
            Some(frame) => self.channel.deliver_to(subscriber_id, frame).await,
            None => DeliveryReport::default(),
        }
    }

    pub async fn notify_grade_update(&self, subscriber_id: &str, data: GradeUpdate) -> DeliveryReport {
        self.publish(subscriber_id, data.into()).await
    }

    pub async fn notify_makeup_class(&self, subscriber_id: &str, data: MakeupClass) -> DeliveryReport {
        self.publish(subscriber_id, data.into()).await
    }

    pub async fn notify_class_cancellation(
        &self,
        subscriber_id: &str,
        data: ClassCancellation,
    ) -> DeliveryReport {
        self.publish(subscriber_id, data.into()).await
    }

    pub async fn notify_training_score(&self, subscriber_id: &str, data: TrainingScore) -> DeliveryReport {
        self.publish(subscriber_id, data.into()).await
    }

    /// Deliver the same raw payload under `event_name` to every listed
    /// subscriber's group, concurrently.
    ///
    /// No envelope is applied. Returns once every group delivery has
    /// finished; the report aggregates all of them.
    pub async fn notify_batch(
        &self,
        subscriber_ids: &[SubscriberId],
        event_name: &str,
        data: &serde_json::Value,
    ) -> DeliveryReport {
        tracing::info!(
            event = event_name,
            subscribers = subscriber_ids.len(),
            "Publishing batch notification"
        );

        let Some(frame) = encode(event_name, data) else {
            return DeliveryReport::default();
        };

        let deliveries = subscriber_ids
            .iter()
            .map(|id| self.channel.deliver_to(id, frame.clone()));
        let report = join_all(deliveries)
            .await
            .into_iter()
            .fold(DeliveryReport::default(), DeliveryReport::merge);

        if report.failed > 0 {
            tracing::warn!(
                event = event_name,
                delivered = report.delivered,
                failed = report.failed,
                "Batch notification partially failed"
            );
        }
        report
    }

    /// Deliver a `broadcast` envelope to every live connection, regardless
    /// of group membership.
    pub async fn broadcast(
        &self,
        title: &str,
        message: &str,
        data: Option<serde_json::Value>,
    ) -> DeliveryReport {
        tracing::info!(title, "Broadcasting notification");

        let envelope = Envelope::broadcast(title, message, data, Utc::now());
        match encode(EVENT_BROADCAST, &envelope) {
            Some(frame) => self.channel.deliver_all(frame).await,
            None => DeliveryReport::default(),
        }
    }
}

/// Encode a frame, logging instead of failing the publish call.
fn encode<T: Serialize + ?Sized>(event_name: &str, data: &T) -> Option<OutboundFrame> {
    match OutboundFrame::encode(event_name, data) {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::error!(event = event_name, error = %e, "Failed to encode notification");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

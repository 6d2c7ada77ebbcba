//! Handlers for `/api/notify/*`.
//!
//! Every handler validates its body, hands the payload to the dispatcher
//! and reports how many connections accepted it. Publishing to a subscriber
//! with no live connection still succeeds.

use axum::extract::{Path, State};
use axum::Json;
use euit_core::ingress::{
    BatchRequest, BatchResponse, BroadcastRequest, BroadcastResponse, PublishResponse,
};
use euit_core::notification::{
    ClassCancellation, GradeUpdate, MakeupClass, NotificationEvent, NotificationKind,
    TrainingScore,
};
use euit_events::DeliveryReport;

use crate::error::AppResult;
use crate::extract::{normalize_subscriber, ValidatedJson};
use crate::state::AppState;

/// POST /api/notify/ket-qua-hoc-tap/{subscriber_id}
pub async fn grade_update(
    State(state): State<AppState>,
    Path(subscriber_id): Path<String>,
    ValidatedJson(data): ValidatedJson<GradeUpdate>,
) -> AppResult<Json<PublishResponse>> {
    publish(&state, subscriber_id, data.into()).await
}

/// POST /api/notify/bao-bu/{subscriber_id}
pub async fn makeup_class(
    State(state): State<AppState>,
    Path(subscriber_id): Path<String>,
    ValidatedJson(data): ValidatedJson<MakeupClass>,
) -> AppResult<Json<PublishResponse>> {
    publish(&state, subscriber_id, data.into()).await
}

/// POST /api/notify/bao-nghi/{subscriber_id}
pub async fn class_cancellation(
    State(state): State<AppState>,
    Path(subscriber_id): Path<String>,
    ValidatedJson(data): ValidatedJson<ClassCancellation>,
) -> AppResult<Json<PublishResponse>> {
    publish(&state, subscriber_id, data.into()).await
}

/// POST /api/notify/diem-ren-luyen/{subscriber_id}
pub async fn training_score(
    State(state): State<AppState>,
    Path(subscriber_id): Path<String>,
    ValidatedJson(data): ValidatedJson<TrainingScore>,
) -> AppResult<Json<PublishResponse>> {
    publish(&state, subscriber_id, data.into()).await
}

/// POST /api/notify/batch
///
/// Ids are trimmed like path ids; a blank one rejects the whole request.
/// Individual group failures never fail the request; they show up in the
/// aggregate `failed` count.
pub async fn batch(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BatchRequest>,
) -> AppResult<Json<BatchResponse>> {
    let subscriber_ids = request
        .subscriber_ids
        .into_iter()
        .map(normalize_subscriber)
        .collect::<Result<Vec<_>, _>>()?;

    let report = state
        .dispatcher
        .notify_batch(&subscriber_ids, &request.event_name, &request.data)
        .await;

    Ok(Json(BatchResponse {
        success: true,
        kind: NotificationKind::GenericBatch.type_tag().to_string(),
        count: subscriber_ids.len(),
        delivered: report.delivered,
        failed: report.failed,
    }))
}

/// POST /api/notify/broadcast
pub async fn broadcast(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BroadcastRequest>,
) -> AppResult<Json<BroadcastResponse>> {
    let report = state
        .dispatcher
        .broadcast(&request.title, &request.message, request.data)
        .await;

    Ok(Json(BroadcastResponse {
        success: true,
        kind: NotificationKind::Broadcast.type_tag().to_string(),
        delivered: report.delivered,
        failed: report.failed,
    }))
}

async fn publish(
    state: &AppState,
    subscriber_id: String,
    event: NotificationEvent,
) -> AppResult<Json<PublishResponse>> {
    let subscriber_id = normalize_subscriber(subscriber_id)?;
    let kind = event.kind();
    let report: DeliveryReport = state.dispatcher.publish(&subscriber_id, event).await;

    Ok(Json(PublishResponse {
        success: true,
        kind: kind.type_tag().to_string(),
        subscriber_id,
        delivered: report.delivered,
    }))
}

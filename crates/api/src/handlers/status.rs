use axum::extract::{Path, State};
use axum::Json;
use euit_core::ingress::{ServiceInfo, StatusResponse};
use euit_core::protocol::HUB_PATH;

use crate::error::AppResult;
use crate::extract::normalize_subscriber;
use crate::state::AppState;

/// Name reported by the service banner.
pub const SERVICE_NAME: &str = "eUIT Notification Server";

/// GET /api/status/{subscriber_id}
pub async fn subscriber_status(
    State(state): State<AppState>,
    Path(subscriber_id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    let subscriber_id = normalize_subscriber(subscriber_id)?;
    let connections = state.registry.connection_count(&subscriber_id).await;

    Ok(Json(StatusResponse {
        subscriber_id,
        online: connections > 0,
        connections,
    }))
}

/// GET / -- service banner.
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        hub: HUB_PATH.to_string(),
        health: "/health".to_string(),
        online_subscriber_count: state.registry.online_subscriber_count().await,
        server_time: chrono::Utc::now(),
    })
}

//! Request and response bodies of the HTTP ingress used by the backend.
//!
//! Shared by the server handlers and the backend-side client so both ends
//! agree on the camelCase wire shape.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{SubscriberId, Timestamp};

/// `POST /api/notify/batch`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub subscriber_ids: Vec<SubscriberId>,
    #[validate(length(min = 1))]
    pub event_name: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// `POST /api/notify/broadcast`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Response of the four typed publish endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub subscriber_id: SubscriberId,
    /// Connections that accepted the frame.
    pub delivered: usize,
}

/// Response of the batch endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: String,
    /// Number of subscriber ids in the request.
    pub count: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Response of the broadcast endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResponse {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub delivered: usize,
    pub failed: usize,
}

/// `GET /api/status/{subscriberId}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub subscriber_id: SubscriberId,
    pub online: bool,
    pub connections: usize,
}

/// `GET /` service banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub hub: String,
    pub health: String,
    pub online_subscriber_count: usize,
    pub server_time: Timestamp,
}

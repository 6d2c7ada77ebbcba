//! REST client for the notification ingress.
//!
//! Wraps `POST /api/notify/*` and `GET /api/status/*` using [`reqwest`].
//! Request and response bodies are the shared types from
//! [`euit_core::ingress`], so both sides agree on the wire shape.

use euit_core::ingress::{
    BatchRequest, BatchResponse, BroadcastRequest, BroadcastResponse, PublishResponse,
    StatusResponse,
};
use euit_core::notification::{ClassCancellation, GradeUpdate, MakeupClass, TrainingScore};
use euit_core::types::SubscriberId;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;

/// Errors from the notification client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL cannot carry request paths.
    #[error("Invalid notification server URL: {0}")]
    InvalidUrl(String),

    /// The server answered with a non-2xx status.
    #[error("Notification server error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body, usually `{"error", "code"}`.
        body: String,
    },
}

/// HTTP client for one notification server.
#[derive(Debug, Clone)]
pub struct NotificationClient {
    client: reqwest::Client,
    base_url: Url,
}

impl NotificationClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.base_url));
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub async fn notify_grade_update(
        &self,
        subscriber_id: &str,
        data: &GradeUpdate,
    ) -> Result<PublishResponse, ClientError> {
        self.post(&["api", "notify", "ket-qua-hoc-tap", subscriber_id], data)
            .await
    }

    pub async fn notify_makeup_class(
        &self,
        subscriber_id: &str,
        data: &MakeupClass,
    ) -> Result<PublishResponse, ClientError> {
        self.post(&["api", "notify", "bao-bu", subscriber_id], data)
            .await
    }

    pub async fn notify_class_cancellation(
        &self,
        subscriber_id: &str,
        data: &ClassCancellation,
    ) -> Result<PublishResponse, ClientError> {
        self.post(&["api", "notify", "bao-nghi", subscriber_id], data)
            .await
    }

    pub async fn notify_training_score(
        &self,
        subscriber_id: &str,
        data: &TrainingScore,
    ) -> Result<PublishResponse, ClientError> {
        self.post(&["api", "notify", "diem-ren-luyen", subscriber_id], data)
            .await
    }

    /// Send one raw payload under `event_name` to many subscribers.
    pub async fn notify_batch(
        &self,
        subscriber_ids: Vec<SubscriberId>,
        event_name: impl Into<String>,
        data: serde_json::Value,
    ) -> Result<BatchResponse, ClientError> {
        let request = BatchRequest {
            subscriber_ids,
            event_name: event_name.into(),
            data,
        };
        self.post(&["api", "notify", "batch"], &request).await
    }

    /// Send to every live connection.
    pub async fn broadcast(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        data: Option<serde_json::Value>,
    ) -> Result<BroadcastResponse, ClientError> {
        let request = BroadcastRequest {
            title: title.into(),
            message: message.into(),
            data,
        };
        self.post(&["api", "notify", "broadcast"], &request).await
    }

    /// Whether the subscriber has at least one live connection.
    pub async fn is_online(&self, subscriber_id: &str) -> Result<bool, ClientError> {
        let response = self
            .client
            .get(self.endpoint(&["api", "status", subscriber_id]))
            .send()
            .await?;

        let status: StatusResponse = Self::parse_response(response).await?;
        Ok(status.online)
    }

    // ---- private helpers ----

    /// Append `segments` to the base URL, percent-encoding each one so a
    /// subscriber id cannot change the route.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so the segments are writable.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn post<B, R>(&self, segments: &[&str], body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(segments))
            .json(body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn parse_response<R: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<R, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {e}>"));
            tracing::warn!(status = status.as_u16(), %body, "Notification server rejected request");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

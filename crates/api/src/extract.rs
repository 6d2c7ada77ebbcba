//! Request extractors shared by the ingress handlers.

use axum::extract::{FromRequest, Request};
use axum::Json;
use euit_core::error::CoreError;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that is deserialized and then checked with [`Validate`].
///
/// Malformed JSON or missing fields are rejected as `BAD_REQUEST`; rule
/// violations as `VALIDATION_ERROR`. Both are 400s with the standard error
/// body.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        value.validate().map_err(CoreError::from)?;
        Ok(Self(value))
    }
}

/// Trim a subscriber id taken from the URL path or a request body, rejecting
/// blank ones.
pub fn normalize_subscriber(raw: String) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("subscriberId must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

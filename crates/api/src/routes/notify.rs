//! Route definitions for the `/notify` ingress.
//!
//! Called by the backend, not by end-user clients.

use axum::routing::post;
use axum::Router;

use crate::handlers::notify;
use crate::state::AppState;

/// Routes mounted at `/notify`.
///
/// ```text
/// POST   /ket-qua-hoc-tap/{subscriber_id}   -> grade_update
/// POST   /bao-bu/{subscriber_id}            -> makeup_class
/// POST   /bao-nghi/{subscriber_id}          -> class_cancellation
/// POST   /diem-ren-luyen/{subscriber_id}    -> training_score
/// POST   /batch                             -> batch
/// POST   /broadcast                         -> broadcast
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ket-qua-hoc-tap/{subscriber_id}", post(notify::grade_update))
        .route("/bao-bu/{subscriber_id}", post(notify::makeup_class))
        .route("/bao-nghi/{subscriber_id}", post(notify::class_cancellation))
        .route("/diem-ren-luyen/{subscriber_id}", post(notify::training_score))
        .route("/batch", post(notify::batch))
        .route("/broadcast", post(notify::broadcast))
}

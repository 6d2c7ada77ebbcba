pub mod health;
pub mod notify;

use axum::routing::get;
use axum::Router;

use crate::handlers::status;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /notify/ket-qua-hoc-tap/{subscriber_id}          grade update (POST)
/// /notify/bao-bu/{subscriber_id}                   make-up class (POST)
/// /notify/bao-nghi/{subscriber_id}                 class cancellation (POST)
/// /notify/diem-ren-luyen/{subscriber_id}           training score (POST)
/// /notify/batch                                    raw payload to many subscribers (POST)
/// /notify/broadcast                                every live connection (POST)
///
/// /status/{subscriber_id}                          presence (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/notify", notify::router())
        .route("/status/{subscriber_id}", get(status::subscriber_status))
}

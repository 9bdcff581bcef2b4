use axum::Json;

use crate::models::UsageResponse;
use crate::rate_limit::MAX_FREE_USES;

/// Optimistic quota snapshot.
///
/// In a multi-process deployment this endpoint cannot see the proxy
/// endpoint's in-memory counters, so it reports the full quota and leaves
/// enforcement to the proxy. Deliberately not wired to the usage store.
pub async fn usage_handler() -> Json<UsageResponse> {
    Json(UsageResponse {
        uses_remaining: MAX_FREE_USES,
        reset_time_hours: 0.0,
        note: "Usage is tracked on each request",
    })
}

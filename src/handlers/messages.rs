use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::config::API_KEY_VAR;
use crate::metrics::{
    RATE_LIMITED_TOTAL, REQUEST_LATENCY, REQUEST_TOTAL, TRACKED_CLIENTS, UPSTREAM_FAILURES_TOTAL,
};
use crate::models::ErrorBody;
use crate::state::AppState;

/// Protocol version sent with every upstream call.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Proxies one request to the upstream Messages API, enforcing the
/// per-client daily quota. Quota is consumed only on upstream success:
/// transport failures and upstream error statuses are passed back to the
/// caller without charging the client.
pub async fn messages_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    REQUEST_TOTAL.inc();
    let start = Instant::now();

    let Some(api_key) = state.api_key.as_deref() else {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::message(format!(
                "Server not configured. Please set {API_KEY_VAR} environment variable."
            )),
        );
    };

    let client_id = resolve_client_id(&headers);

    let decision = state.limiter.check_quota(&client_id, Utc::now());
    if !decision.allowed {
        RATE_LIMITED_TOTAL.inc();
        info!(client_id = %client_id, "daily quota exhausted");
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            ErrorBody::rate_limited(decision.reset_hours.unwrap_or(0.0)),
        );
    }

    let result = state
        .client
        .post(format!("{}/v1/messages", state.upstream_url))
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await;

    let upstream = match result {
        Ok(res) => res,
        Err(e) => {
            UPSTREAM_FAILURES_TOTAL.inc();
            error!(error = %e, "upstream request failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::message(e.to_string()));
        }
    };

    // reqwest and axum may pin different http versions, so convert by value
    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);

    let upstream_body = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            UPSTREAM_FAILURES_TOTAL.inc();
            error!(error = %e, "failed to read upstream response");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::message(e.to_string()));
        }
    };

    // Upstream errors pass through verbatim and do not consume quota.
    if !status.is_success() {
        return passthrough(status, upstream_body);
    }

    state.limiter.record_use(&client_id, Utc::now());
    TRACKED_CLIENTS.set(state.limiter.tracked_clients() as f64);
    let updated = state.limiter.check_quota(&client_id, Utc::now());

    REQUEST_LATENCY.observe(start.elapsed().as_secs_f64());

    let mut response = passthrough(status, upstream_body);
    response
        .headers_mut()
        .insert("x-uses-remaining", HeaderValue::from(updated.remaining));
    response
}

/// Rate-limit key for a request: explicit client id header, else the
/// forwarded address, else one shared anonymous bucket.
fn resolve_client_id(headers: &HeaderMap) -> String {
    for name in ["x-client-id", "x-forwarded-for"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }
    "anonymous".to_string()
}

fn error_response(status: StatusCode, body: ErrorBody) -> Response {
    (status, Json(body)).into_response()
}

fn passthrough(status: StatusCode, body: Bytes) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_id_prefers_explicit_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-client-id", "abc".parse().unwrap());
        headers.insert("x-forwarded-for", "203.0.113.7".parse().unwrap());

        assert_eq!(resolve_client_id(&headers), "abc");
    }

    #[test]
    fn client_id_falls_back_to_forwarded_address() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7".parse().unwrap());

        assert_eq!(resolve_client_id(&headers), "203.0.113.7");
    }

    #[test]
    fn unidentified_clients_share_the_anonymous_bucket() {
        let headers = HeaderMap::new();

        assert_eq!(resolve_client_id(&headers), "anonymous");
    }

    #[test]
    fn empty_client_id_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("x-client-id", "".parse().unwrap());

        assert_eq!(resolve_client_id(&headers), "anonymous");
    }
}

use axum::{
    Json, Router,
    http::{HeaderName, Method, StatusCode, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::models::ErrorBody;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-client-id")])
        .expose_headers([HeaderName::from_static("x-uses-remaining")]);

    Router::new()
        .route(
            "/messages",
            post(handlers::messages_handler)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/usage",
            get(handlers::usage_handler)
                .post(handlers::usage_handler)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(cors)
        .with_state(state)
}

// Bare OPTIONS must answer 200 even outside a CORS preflight exchange.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::message("Method not allowed")),
    )
}

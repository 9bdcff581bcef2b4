mod config;
mod handlers;
mod metrics;
mod models;
mod rate_limit;
mod routes;
mod state;
mod usage;

use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Args;
use state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let api_key = config::read_api_key();
    if api_key.is_none() {
        warn!(
            "{} is not set; proxied requests will answer 500 until it is configured",
            config::API_KEY_VAR
        );
    }

    let state = Arc::new(AppState::new(&args, api_key));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    info!("gateway running on http://localhost:{}", args.port);
    info!("forwarding to {}", args.upstream_url);
    info!(
        "quota: {} requests per {} hours per client",
        args.max_free_uses, args.window_hours
    );
    axum::serve(listener, app).await.unwrap();
}

use crate::config::Args;
use crate::rate_limit::RateLimiter;

// App's shared state
pub struct AppState {
    pub client: reqwest::Client,
    /// Upstream API key, read once at startup. `None` means every proxied
    /// request answers 500 until the process is restarted with the key set.
    pub api_key: Option<String>,
    pub upstream_url: String,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(args: &Args, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            upstream_url: args.upstream_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::new(args.max_free_uses, args.window_hours * 3_600_000),
        }
    }
}

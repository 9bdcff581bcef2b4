use clap::Parser;

/// Environment variable holding the upstream Anthropic API key.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "anthropic-gateway")]
#[command(about = "Rate-limiting reverse proxy for the Anthropic Messages API")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Upstream API base URL
    #[arg(short, long, default_value = "https://api.anthropic.com")]
    pub upstream_url: String,

    // Max successful requests per client per window
    #[arg(long, default_value_t = crate::rate_limit::MAX_FREE_USES)]
    pub max_free_uses: u32,

    // Quota window in hours
    #[arg(long, default_value_t = 24)]
    pub window_hours: i64,
}

/// Reads the upstream API key once at startup. A missing key is not fatal
/// here; requests are answered with a 500 until it is configured.
pub fn read_api_key() -> Option<String> {
    std::env::var(API_KEY_VAR).ok().filter(|k| !k.is_empty())
}

//! Compiled-in constants and environment configuration

use std::env;

/// CoinGecko API v3 base URL
pub const BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Number of top-ranked coins to track
pub const TOP_COINS_COUNT: usize = 50;

/// Minimum delay between the start of consecutive upstream calls
/// (30 calls per minute on the free tier)
pub const RATE_LIMIT_MS: u64 = 2000;

/// Refresh scheduler tick interval
pub const UPDATE_INTERVAL_SECS: u64 = 5 * 60;

/// Upstream request timeout
pub const FETCH_TIMEOUT_SECS: u64 = 30;

/// Attempts for the initial coin list fetch before startup is aborted
pub const LIST_RETRY_ATTEMPTS: u32 = 3;

/// Pause between initial coin list attempts
pub const LIST_RETRY_PAUSE_SECS: u64 = 10;

pub const DEFAULT_PORT: u16 = 8080;

/// CoinGecko demo API key, sent as `x-cg-demo-api-key` when present
pub fn api_key() -> Option<String> {
    env::var("COINGECKO_API_KEY").ok().filter(|k| !k.is_empty())
}

/// Listening port from the PORT environment variable (Render-style),
/// falling back to [`DEFAULT_PORT`]
pub fn server_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Shared application state for the webserver
///
/// Route handlers only ever read the market cache; all mutation happens in
/// the bootstrap and refresh tasks.
use crate::cache::MarketCache;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// The process-wide market dataset
    pub cache: Arc<MarketCache>,

    /// Server startup time
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(cache: Arc<MarketCache>) -> Self {
        Self {
            cache,
            startup_time: chrono::Utc::now(),
        }
    }

    /// Server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        (chrono::Utc::now() - self.startup_time).num_seconds().max(0) as u64
    }
}

//! Recurring refresh of the market cache
//!
//! Waits for bootstrap to flip the readiness flag, then ticks every five
//! minutes forever. Each tick costs exactly one upstream call (the ranked
//! list); new historical points are synthesized locally from the fetched
//! current price, so the loop's call volume is independent of coin and
//! period counts.

use crate::cache::MarketCache;
use crate::coingecko::{MarketCoin, MarketDataSource};
use crate::config;
use crate::logger::{self, LogTag};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Run the refresh loop for the lifetime of the process
pub async fn run(source: Arc<dyn MarketDataSource>, cache: Arc<MarketCache>) {
    while !cache.is_ready() {
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    logger::info(
        LogTag::Refresh,
        &format!(
            "🔄 Refresh scheduler started ({}s ticks)",
            config::UPDATE_INTERVAL_SECS
        ),
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config::UPDATE_INTERVAL_SECS));
    // the first interval tick completes immediately; consume it so the
    // first refresh happens one full interval after readiness
    interval.tick().await;

    let mut tick: u64 = 0;
    loop {
        interval.tick().await;
        tick += 1;
        run_tick(source.as_ref(), &cache, tick).await;
    }
}

/// One refresh tick: merge fresh current values, then extend rolling windows
///
/// A failed markets fetch skips the merge but never the local appends; the
/// windows keep moving on the last known prices.
pub async fn run_tick(source: &dyn MarketDataSource, cache: &MarketCache, tick: u64) {
    logger::debug(LogTag::Refresh, &format!("Tick {} starting", tick));

    match source.fetch_markets().await {
        Ok(coins) => {
            let fetched = coins.len();
            let (updated, added) =
                cache.merge_market(coins.into_iter().map(MarketCoin::into_snapshot).collect());
            if added > 0 {
                logger::info(
                    LogTag::Refresh,
                    &format!(
                        "✅ Prices updated ({} fetched, {} updated, {} new coins tracked)",
                        fetched, updated, added
                    ),
                );
            } else {
                logger::info(
                    LogTag::Refresh,
                    &format!("✅ Prices updated ({} coins)", updated),
                );
            }
        }
        Err(e) => logger::warning(
            LogTag::Refresh,
            &format!("Price refresh skipped this tick: {}", e),
        ),
    }

    let now_ms = Utc::now().timestamp_millis();
    let appended = cache.append_history_points(tick, now_ms);
    logger::debug(
        LogTag::Refresh,
        &format!("Tick {}: {} chart points appended", tick, appended),
    );
}

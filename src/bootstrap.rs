//! One-time startup population of the market cache
//!
//! Strictly ordered phases: ranked list, per-coin historical charts,
//! trending, global stats, then the readiness flip. Upstream pacing, not
//! CPU, bounds this sequence, so phases run one after another; the
//! historical phase alone is N coins x 7 periods of rate-limited calls
//! (roughly ten minutes at the free-tier pace).

use crate::cache::{MarketCache, Period, TrendingCategory, TrendingCoin};
use crate::coingecko::{MarketCoin, MarketDataSource, TrendingResponse};
use crate::config;
use crate::logger::{self, LogTag};
use crate::resample::resample;
use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;

/// Positional labels for the top trending categories
const TREND_LABELS: [&str; 5] = [
    "🔥 Trending #1",
    "📈 Growing fast",
    "🚀 Popular today",
    "⭐ Hot searches",
    "💎 Rising interest",
];
const TREND_FALLBACK: &str = "📊 Trending";
const TREND_CATEGORY_COUNT: usize = 5;

/// Run the full bootstrap sequence
///
/// Fails only when the initial ranked list cannot be fetched at all; every
/// later failure is scoped to its coin/period/phase and logged instead.
pub async fn run(source: Arc<dyn MarketDataSource>, cache: Arc<MarketCache>) -> Result<()> {
    run_with_retry_pause(
        source.as_ref(),
        &cache,
        Duration::from_secs(config::LIST_RETRY_PAUSE_SECS),
    )
    .await
}

async fn run_with_retry_pause(
    source: &dyn MarketDataSource,
    cache: &MarketCache,
    retry_pause: Duration,
) -> Result<()> {
    // Phase 1: ranked coin list. Without it there is nothing to serve, so
    // exhausted retries abort startup rather than leaving an empty-but-ready
    // cache.
    logger::info(
        LogTag::Bootstrap,
        &format!("📊 Phase 1: fetching top {} coins...", config::TOP_COINS_COUNT),
    );
    let coins = fetch_list_with_retry(source, retry_pause).await?;
    let count = coins.len();
    cache.seed_coins(coins.into_iter().map(MarketCoin::into_snapshot).collect());
    logger::info(
        LogTag::Bootstrap,
        &format!("✅ Fetched {} coins successfully", count),
    );

    // Phase 2: historical charts, the dominant cost of bootstrap
    let ids = cache.coin_ids();
    logger::info(
        LogTag::Bootstrap,
        &format!(
            "📈 Phase 2: loading historical data ({} coins x {} periods)...",
            ids.len(),
            Period::ALL.len()
        ),
    );
    for (index, id) in ids.iter().enumerate() {
        logger::info(
            LogTag::Bootstrap,
            &format!("[{}/{}] {}...", index + 1, ids.len(), id),
        );
        load_coin_history(source, cache, id).await;
    }
    logger::info(LogTag::Bootstrap, "✅ Historical data phase complete");

    // Phase 3: trending coins and categories, fully replaced
    logger::info(LogTag::Bootstrap, "🔥 Phase 3: fetching trending coins...");
    match source.fetch_trending().await {
        Ok(trending) => {
            let (coins, categories) = convert_trending(trending);
            logger::info(
                LogTag::Bootstrap,
                &format!(
                    "✅ Fetched {} trending coins, {} categories",
                    coins.len(),
                    categories.len()
                ),
            );
            cache.set_trending(coins, categories);
        }
        Err(e) => logger::warning(
            LogTag::Bootstrap,
            &format!("Trending fetch failed, continuing without it: {}", e),
        ),
    }

    // Phase 4: global market stats
    logger::info(LogTag::Bootstrap, "🌍 Phase 4: fetching global market stats...");
    match source.fetch_global().await {
        Ok(global) => {
            cache.set_global(global.into_stats());
            logger::info(LogTag::Bootstrap, "✅ Global stats updated");
        }
        Err(e) => logger::warning(
            LogTag::Bootstrap,
            &format!("Global stats fetch failed, continuing without them: {}", e),
        ),
    }

    cache.set_ready();
    logger::info(
        LogTag::Bootstrap,
        "🚀 All data loaded, server is ready to serve requests",
    );
    Ok(())
}

async fn fetch_list_with_retry(
    source: &dyn MarketDataSource,
    retry_pause: Duration,
) -> Result<Vec<MarketCoin>> {
    for attempt in 1..=config::LIST_RETRY_ATTEMPTS {
        match source.fetch_markets().await {
            Ok(coins) if !coins.is_empty() => return Ok(coins),
            Ok(_) => logger::warning(
                LogTag::Bootstrap,
                &format!(
                    "Ranked list came back empty (attempt {}/{})",
                    attempt,
                    config::LIST_RETRY_ATTEMPTS
                ),
            ),
            Err(e) => logger::warning(
                LogTag::Bootstrap,
                &format!(
                    "Ranked list fetch failed (attempt {}/{}): {}",
                    attempt,
                    config::LIST_RETRY_ATTEMPTS,
                    e
                ),
            ),
        }
        if attempt < config::LIST_RETRY_ATTEMPTS {
            tokio::time::sleep(retry_pause).await;
        }
    }
    bail!(
        "initial coin list unavailable after {} attempts, aborting startup",
        config::LIST_RETRY_ATTEMPTS
    )
}

/// Fetch and store all retention periods for one coin
///
/// A failed or empty chart skips that one period; the coin keeps whatever
/// periods did load and the phase moves on.
async fn load_coin_history(source: &dyn MarketDataSource, cache: &MarketCache, coin_id: &str) {
    for period in Period::ALL {
        match source.fetch_market_chart(coin_id, period.chart_days()).await {
            Ok(chart) => {
                let points = resample(&chart.into_points(), period.capacity());
                if points.is_empty() {
                    logger::warning(
                        LogTag::Bootstrap,
                        &format!(
                            "Empty {} chart for {}, leaving period unpopulated",
                            period.label(),
                            coin_id
                        ),
                    );
                    continue;
                }
                logger::debug(
                    LogTag::Bootstrap,
                    &format!("{}: {} -> {} points", coin_id, period.label(), points.len()),
                );
                cache.insert_history(coin_id, period, points);
            }
            Err(e) => logger::warning(
                LogTag::Bootstrap,
                &format!(
                    "Skipping {} history for {}: {}",
                    period.label(),
                    coin_id,
                    e
                ),
            ),
        }
    }
}

fn convert_trending(
    trending: TrendingResponse,
) -> (Vec<TrendingCoin>, Vec<TrendingCategory>) {
    let coins = trending
        .coins
        .into_iter()
        .map(|entry| TrendingCoin {
            id: entry.item.id,
            name: entry.item.name,
            symbol: entry.item.symbol,
            logo: entry.item.thumb,
            rank: entry.item.market_cap_rank.unwrap_or(0),
        })
        .collect();

    // Labels are decorative, assigned by list position only
    let categories = trending
        .categories
        .into_iter()
        .take(TREND_CATEGORY_COUNT)
        .enumerate()
        .map(|(i, category)| TrendingCategory {
            name: category.name,
            trend: TREND_LABELS.get(i).copied().unwrap_or(TREND_FALLBACK).to_string(),
        })
        .collect();

    (coins, categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coingecko::TrendingCategoryEntry;
    use crate::testutil::StubSource;

    #[tokio::test]
    async fn full_bootstrap_with_one_failed_period() {
        let source = StubSource::new(50).fail_chart("coin-03", Period::D7.chart_days());
        let cache = MarketCache::new();

        run_with_retry_pause(&source, &cache, Duration::ZERO)
            .await
            .unwrap();

        assert!(cache.is_ready());
        assert_eq!(cache.coin_count(), 50);

        let coins = cache.coins();
        let complete = coins.iter().filter(|c| c.history.len() == 7).count();
        assert_eq!(complete, 49);

        let partial = cache.coin("coin-03").unwrap();
        assert_eq!(partial.history.len(), 6);
        assert!(!partial.history.contains_key(&Period::D7));

        // trending and global landed too
        let (trending_coins, categories) = cache.trending();
        assert_eq!(trending_coins.len(), 2);
        assert_eq!(categories.len(), 5);
        assert_eq!(cache.global().total_market_cap, 2.5e12);
    }

    #[tokio::test]
    async fn bootstrap_resamples_to_period_capacity() {
        let source = StubSource::new(1);
        let cache = MarketCache::new();

        run_with_retry_pause(&source, &cache, Duration::ZERO)
            .await
            .unwrap();

        let coin = cache.coin("coin-01").unwrap();
        // stub charts carry 600 raw points; every series lands at its cap
        for period in Period::ALL {
            assert_eq!(coin.history[&period].len(), period.capacity().min(600));
        }
    }

    #[tokio::test]
    async fn list_failure_is_retried_then_succeeds() {
        let source = StubSource::new(3).fail_markets_times(2);
        let cache = MarketCache::new();

        run_with_retry_pause(&source, &cache, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(source.markets_calls(), 3);
        assert!(cache.is_ready());
        assert_eq!(cache.coin_count(), 3);
    }

    #[tokio::test]
    async fn exhausted_list_retries_abort_startup() {
        let source = StubSource::new(3).fail_markets_times(10);
        let cache = MarketCache::new();

        let result = run_with_retry_pause(&source, &cache, Duration::ZERO).await;

        assert!(result.is_err());
        assert_eq!(source.markets_calls(), config::LIST_RETRY_ATTEMPTS);
        assert!(!cache.is_ready());
        assert_eq!(cache.coin_count(), 0);
    }

    #[test]
    fn trending_labels_are_positional_and_capped_at_five() {
        let trending = TrendingResponse {
            coins: vec![],
            categories: (1..=7)
                .map(|i| TrendingCategoryEntry {
                    name: format!("Cat {}", i),
                })
                .collect(),
        };

        let (_, categories) = convert_trending(trending);

        assert_eq!(categories.len(), 5);
        assert_eq!(categories[0].trend, TREND_LABELS[0]);
        assert_eq!(categories[4].trend, TREND_LABELS[4]);
        assert_eq!(categories[2].name, "Cat 3");
    }
}

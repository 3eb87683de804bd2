//! Lock-protected market cache
//!
//! One exclusive mutex guards the whole dataset (coins + global stats +
//! trending). Writes are infrequent and short, so coarse locking keeps every
//! reader on a fully self-consistent snapshot. Lookups by coin id are linear
//! scans; the coin list is bounded by the tracked top-N.

use super::{CoinSnapshot, GlobalStats, Period, PricePoint, TrendingCategory, TrendingCoin};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
struct CacheInner {
    coins: Vec<CoinSnapshot>,
    global: GlobalStats,
    trending_coins: Vec<TrendingCoin>,
    trending_categories: Vec<TrendingCategory>,
}

/// The process-wide market dataset
///
/// Created once in `main` and shared via `Arc`. The mutex is never held
/// across an upstream call; only in-memory merges run under it.
pub struct MarketCache {
    inner: Mutex<CacheInner>,
    ready: AtomicBool,
}

impl MarketCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            ready: AtomicBool::new(false),
        }
    }

    /// Readiness gate: false until bootstrap completes
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Flip the readiness gate; called exactly once, after the bootstrap
    /// sequencer has run all phases
    pub fn set_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub fn coin_count(&self) -> usize {
        self.inner.lock().coins.len()
    }

    /// Initial population from the bootstrap list phase
    pub fn seed_coins(&self, coins: Vec<CoinSnapshot>) {
        let mut inner = self.inner.lock();
        inner.coins = coins;
    }

    /// Ids of all tracked coins, in rank-list order
    pub fn coin_ids(&self) -> Vec<String> {
        self.inner.lock().coins.iter().map(|c| c.id.clone()).collect()
    }

    /// Merge a fresh ranked-list snapshot into the cache
    ///
    /// Overwrites only current-value fields of known coins; historical
    /// series are untouched. Coins not yet tracked are appended with empty
    /// history (never removed). Returns `(updated, added)` counts.
    pub fn merge_market(&self, fetched: Vec<CoinSnapshot>) -> (usize, usize) {
        let mut inner = self.inner.lock();
        let mut updated = 0;
        let mut added = 0;

        for incoming in fetched {
            match inner.coins.iter().position(|c| c.id == incoming.id) {
                Some(index) => {
                    let existing = &mut inner.coins[index];
                    existing.rank = incoming.rank;
                    existing.price = incoming.price;
                    existing.change_24h = incoming.change_24h;
                    existing.market_cap = incoming.market_cap;
                    existing.volume_24h = incoming.volume_24h;
                    existing.sparkline_7d = incoming.sparkline_7d;
                    updated += 1;
                }
                None => {
                    inner.coins.push(incoming);
                    added += 1;
                }
            }
        }

        (updated, added)
    }

    /// Store a freshly resampled series for one coin and period
    ///
    /// Only the history map is touched; current-value fields keep whatever
    /// the last market merge wrote. Unknown coin ids are ignored (the coin
    /// left the list between phases).
    pub fn insert_history(&self, coin_id: &str, period: Period, points: Vec<PricePoint>) -> bool {
        let mut inner = self.inner.lock();
        match inner.coins.iter_mut().find(|c| c.id == coin_id) {
            Some(coin) => {
                coin.history.insert(period, points);
                true
            }
            None => false,
        }
    }

    /// Append a `(now, current price)` point to every series that is due on
    /// this tick
    ///
    /// A period is only extended if it was populated during bootstrap, and
    /// each series evicts its oldest point once at capacity. Returns the
    /// number of points appended across all coins.
    pub fn append_history_points(&self, tick: u64, now_ms: i64) -> usize {
        let mut inner = self.inner.lock();
        let mut appended = 0;

        for coin in inner.coins.iter_mut() {
            let price = coin.price;
            for period in Period::ALL {
                if !period.is_due(tick) {
                    continue;
                }
                if let Some(series) = coin.history.get_mut(&period) {
                    series.push(PricePoint {
                        time: now_ms,
                        price,
                    });
                    if series.len() > period.capacity() {
                        series.remove(0);
                    }
                    appended += 1;
                }
            }
        }

        appended
    }

    pub fn set_global(&self, stats: GlobalStats) {
        self.inner.lock().global = stats;
    }

    pub fn global(&self) -> GlobalStats {
        self.inner.lock().global.clone()
    }

    /// Replace (not merge) the trending dataset
    pub fn set_trending(&self, coins: Vec<TrendingCoin>, categories: Vec<TrendingCategory>) {
        let mut inner = self.inner.lock();
        inner.trending_coins = coins;
        inner.trending_categories = categories;
    }

    pub fn trending(&self) -> (Vec<TrendingCoin>, Vec<TrendingCategory>) {
        let inner = self.inner.lock();
        (
            inner.trending_coins.clone(),
            inner.trending_categories.clone(),
        )
    }

    /// Point-in-time copy of every tracked coin
    pub fn coins(&self) -> Vec<CoinSnapshot> {
        self.inner.lock().coins.clone()
    }

    /// Point-in-time copy of a single coin, or None if not tracked
    pub fn coin(&self, id: &str) -> Option<CoinSnapshot> {
        self.inner.lock().coins.iter().find(|c| c.id == id).cloned()
    }
}

impl Default for MarketCache {
    fn default() -> Self {
        Self::new()
    }
}

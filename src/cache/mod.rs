//! Shared in-memory market dataset
//!
//! Type definitions for cached entities plus the lock-protected store in
//! [`store`]. All entities are created by the bootstrap sequencer and live
//! for the process lifetime; the cache is volatile and rebuilt on restart.

mod store;

pub use store::MarketCache;

use serde::Serialize;
use std::collections::BTreeMap;

/// Named historical retention window
///
/// Each period carries its own chart day-count (upstream fetch window),
/// point capacity (rolling window bound) and append cadence in scheduler
/// ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    H24,
    D7,
    W2,
    M1,
    M3,
    M6,
    Y1,
}

impl Period {
    pub const ALL: [Period; 7] = [
        Period::H24,
        Period::D7,
        Period::W2,
        Period::M1,
        Period::M3,
        Period::M6,
        Period::Y1,
    ];

    /// Wire label used in API payloads
    pub fn label(&self) -> &'static str {
        match self {
            Period::H24 => "24h",
            Period::D7 => "7d",
            Period::W2 => "2w",
            Period::M1 => "1m",
            Period::M3 => "3m",
            Period::M6 => "6m",
            Period::Y1 => "1y",
        }
    }

    /// `days` parameter for the upstream market-chart fetch
    pub fn chart_days(&self) -> u32 {
        match self {
            Period::H24 => 1,
            Period::D7 => 7,
            Period::W2 => 14,
            Period::M1 => 30,
            Period::M3 => 90,
            Period::M6 => 180,
            Period::Y1 => 365,
        }
    }

    /// Maximum number of points a series may hold
    pub fn capacity(&self) -> usize {
        match self {
            Period::H24 => 288, // 5-minute intervals
            Period::D7 => 168,  // hourly
            Period::W2 => 84,   // 4-hour intervals
            Period::M1 => 30,   // daily
            Period::M3 => 90,   // daily
            Period::M6 => 180,  // daily
            Period::Y1 => 52,   // weekly
        }
    }

    /// Append cadence in 5-minute scheduler ticks
    pub fn cadence_ticks(&self) -> u64 {
        match self {
            Period::H24 => 1,
            Period::D7 => 12,
            Period::W2 => 48,
            Period::M1 | Period::M3 | Period::M6 => 288,
            Period::Y1 => 2016,
        }
    }

    /// Whether this period's series is due for a new point on tick `tick`
    pub fn is_due(&self, tick: u64) -> bool {
        tick % self.cadence_ticks() == 0
    }
}

/// One `(timestamp, price)` sample; timestamps are Unix milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub time: i64,
    pub price: f64,
}

/// Full historical dataset for one coin, keyed by retention period
///
/// A missing key means the period was never successfully populated.
pub type HistoryMap = BTreeMap<Period, Vec<PricePoint>>;

/// Everything the cache knows about a single coin
#[derive(Debug, Clone, Default)]
pub struct CoinSnapshot {
    pub id: String,
    pub rank: u32,
    pub name: String,
    pub symbol: String,
    pub logo: String,
    pub price: f64,
    pub change_24h: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub circulating_supply: f64,
    pub total_supply: f64,
    pub max_supply: f64,
    pub ath: f64,
    pub ath_change_percentage: f64,
    pub ath_date: String,
    pub sparkline_7d: Vec<f64>,
    pub history: HistoryMap,
}

/// Market-wide aggregates, last-write-wins
#[derive(Debug, Clone, Default)]
pub struct GlobalStats {
    pub total_market_cap: f64,
    pub total_volume: f64,
    pub btc_dominance: f64,
    pub active_cryptocurrencies: i64,
    pub market_cap_change_24h: f64,
}

#[derive(Debug, Clone)]
pub struct TrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub logo: String,
    pub rank: u32,
}

#[derive(Debug, Clone)]
pub struct TrendingCategory {
    pub name: String,
    pub trend: String,
}

//! In-memory upstream stub shared by bootstrap and scheduler tests

use crate::coingecko::{
    GlobalData, MarketChart, MarketCoin, MarketDataSource, TrendingCategoryEntry, TrendingEntry,
    TrendingItem, TrendingResponse,
};
use crate::errors::FetchError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};

pub fn market_coin(id: &str, rank: u32, price: f64) -> MarketCoin {
    MarketCoin {
        id: id.to_string(),
        symbol: id.chars().take(3).collect(),
        name: id.to_uppercase(),
        image: Some(format!("https://img/{}.png", id)),
        market_cap_rank: Some(rank),
        current_price: Some(price),
        price_change_percentage_24h: Some(1.5),
        market_cap: Some(price * 1e6),
        total_volume: Some(price * 1e4),
        circulating_supply: Some(1e6),
        total_supply: Some(2e6),
        max_supply: None,
        ath: Some(price * 2.0),
        ath_change_percentage: Some(-50.0),
        ath_date: Some("2024-01-01T00:00:00.000Z".to_string()),
        sparkline_in_7d: None,
    }
}

/// Deterministic fake provider
///
/// Returns `coin-01` .. `coin-NN`, optionally failing the first few
/// ranked-list calls or specific `(coin, days)` chart fetches.
pub struct StubSource {
    coins: Vec<MarketCoin>,
    chart_points: usize,
    failing_charts: HashSet<(String, u32)>,
    markets_failures_remaining: AtomicU32,
    markets_calls: AtomicU32,
}

impl StubSource {
    pub fn new(coin_count: usize) -> Self {
        let coins = (1..=coin_count)
            .map(|i| market_coin(&format!("coin-{:02}", i), i as u32, 100.0 + i as f64))
            .collect();
        Self {
            coins,
            chart_points: 600,
            failing_charts: HashSet::new(),
            markets_failures_remaining: AtomicU32::new(0),
            markets_calls: AtomicU32::new(0),
        }
    }

    pub fn with_coins(coins: Vec<MarketCoin>) -> Self {
        let mut stub = Self::new(0);
        stub.coins = coins;
        stub
    }

    pub fn fail_chart(mut self, coin_id: &str, days: u32) -> Self {
        self.failing_charts.insert((coin_id.to_string(), days));
        self
    }

    pub fn fail_markets_times(self, count: u32) -> Self {
        self.markets_failures_remaining
            .store(count, Ordering::SeqCst);
        self
    }

    pub fn markets_calls(&self) -> u32 {
        self.markets_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for StubSource {
    async fn fetch_markets(&self) -> Result<Vec<MarketCoin>, FetchError> {
        self.markets_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.markets_failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.markets_failures_remaining
                .store(remaining - 1, Ordering::SeqCst);
            return Err(FetchError::transport("/coins/markets", "connection reset"));
        }
        Ok(self.coins.clone())
    }

    async fn fetch_market_chart(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<MarketChart, FetchError> {
        if self.failing_charts.contains(&(coin_id.to_string(), days)) {
            return Err(FetchError::transport(
                &format!("/coins/{}/market_chart", coin_id),
                "timed out",
            ));
        }
        let prices = (0..self.chart_points)
            .map(|i| (1_700_000_000_000.0 + i as f64 * 60_000.0, 100.0 + i as f64))
            .collect();
        Ok(MarketChart { prices })
    }

    async fn fetch_global(&self) -> Result<GlobalData, FetchError> {
        Ok(GlobalData {
            total_market_cap: HashMap::from([("usd".to_string(), 2.5e12)]),
            total_volume: HashMap::from([("usd".to_string(), 9.0e10)]),
            market_cap_percentage: HashMap::from([("btc".to_string(), 52.0)]),
            active_cryptocurrencies: 10_000,
            market_cap_change_percentage_24h_usd: 1.2,
        })
    }

    async fn fetch_trending(&self) -> Result<TrendingResponse, FetchError> {
        Ok(TrendingResponse {
            coins: vec![
                TrendingEntry {
                    item: TrendingItem {
                        id: "pepe".to_string(),
                        name: "Pepe".to_string(),
                        symbol: "PEPE".to_string(),
                        thumb: String::new(),
                        market_cap_rank: Some(40),
                    },
                },
                TrendingEntry {
                    item: TrendingItem {
                        id: "sui".to_string(),
                        name: "Sui".to_string(),
                        symbol: "SUI".to_string(),
                        thumb: String::new(),
                        market_cap_rank: None,
                    },
                },
            ],
            categories: (1..=6)
                .map(|i| TrendingCategoryEntry {
                    name: format!("Category {}", i),
                })
                .collect(),
        })
    }
}

//! CoinGecko API v3 client
//!
//! Typed response structures plus the rate-limited HTTP client. Every call
//! is a live round trip paced by [`rate_limit::RequestPacer`]; there is no
//! retry and no caching at this layer, callers decide how to recover.

mod rate_limit;

pub use rate_limit::RequestPacer;

use crate::cache::{CoinSnapshot, GlobalStats, PricePoint};
use crate::config;
use crate::errors::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// One entry from `/coins/markets`
#[derive(Debug, Clone, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: Option<String>,
    pub market_cap_rank: Option<u32>,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub ath: Option<f64>,
    pub ath_change_percentage: Option<f64>,
    pub ath_date: Option<String>,
    pub sparkline_in_7d: Option<Sparkline>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sparkline {
    pub price: Vec<f64>,
}

impl MarketCoin {
    /// Convert a provider record into our cache shape
    ///
    /// Null provider fields collapse to zero / empty, matching the
    /// trust-as-is stance on upstream numbers.
    pub fn into_snapshot(self) -> CoinSnapshot {
        CoinSnapshot {
            id: self.id,
            rank: self.market_cap_rank.unwrap_or(0),
            name: self.name,
            symbol: self.symbol,
            logo: self.image.unwrap_or_default(),
            price: self.current_price.unwrap_or(0.0),
            change_24h: self.price_change_percentage_24h.unwrap_or(0.0),
            market_cap: self.market_cap.unwrap_or(0.0),
            volume_24h: self.total_volume.unwrap_or(0.0),
            circulating_supply: self.circulating_supply.unwrap_or(0.0),
            total_supply: self.total_supply.unwrap_or(0.0),
            max_supply: self.max_supply.unwrap_or(0.0),
            ath: self.ath.unwrap_or(0.0),
            ath_change_percentage: self.ath_change_percentage.unwrap_or(0.0),
            ath_date: self.ath_date.unwrap_or_default(),
            sparkline_7d: self.sparkline_in_7d.map(|s| s.price).unwrap_or_default(),
            history: Default::default(),
        }
    }
}

/// Raw `/coins/{id}/market_chart` body; timestamps come as f64 milliseconds
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<(f64, f64)>,
}

impl MarketChart {
    pub fn into_points(self) -> Vec<PricePoint> {
        self.prices
            .into_iter()
            .map(|(time, price)| PricePoint {
                time: time as i64,
                price,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlobalResponse {
    pub data: GlobalData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlobalData {
    #[serde(default)]
    pub total_market_cap: HashMap<String, f64>,
    #[serde(default)]
    pub total_volume: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap_percentage: HashMap<String, f64>,
    #[serde(default)]
    pub active_cryptocurrencies: i64,
    #[serde(default)]
    pub market_cap_change_percentage_24h_usd: f64,
}

impl GlobalData {
    pub fn into_stats(self) -> GlobalStats {
        GlobalStats {
            total_market_cap: self.total_market_cap.get("usd").copied().unwrap_or(0.0),
            total_volume: self.total_volume.get("usd").copied().unwrap_or(0.0),
            btc_dominance: self.market_cap_percentage.get("btc").copied().unwrap_or(0.0),
            active_cryptocurrencies: self.active_cryptocurrencies,
            market_cap_change_24h: self.market_cap_change_percentage_24h_usd,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendingResponse {
    #[serde(default)]
    pub coins: Vec<TrendingEntry>,
    #[serde(default)]
    pub categories: Vec<TrendingCategoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendingEntry {
    pub item: TrendingItem,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendingItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub thumb: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendingCategoryEntry {
    #[serde(default)]
    pub name: String,
}

/// The four logical upstream request shapes
///
/// Bootstrap and scheduler run against this trait so their sequencing logic
/// can be exercised without a network.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Ranked coin list with 24h change and sparkline
    async fn fetch_markets(&self) -> Result<Vec<MarketCoin>, FetchError>;

    /// Raw timestamped price points for one coin over a day-count window
    async fn fetch_market_chart(&self, coin_id: &str, days: u32)
        -> Result<MarketChart, FetchError>;

    async fn fetch_global(&self) -> Result<GlobalData, FetchError>;

    async fn fetch_trending(&self) -> Result<TrendingResponse, FetchError>;
}

/// Rate-limited CoinGecko HTTP client
pub struct CoinGeckoClient {
    http: Client,
    pacer: RequestPacer,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new() -> Result<Self, String> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config::FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            http,
            pacer: RequestPacer::new(Duration::from_millis(config::RATE_LIMIT_MS)),
            base_url: config::BASE_URL.to_string(),
            api_key: config::api_key(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, FetchError> {
        let _guard = self
            .pacer
            .acquire()
            .await
            .map_err(|e| FetchError::transport(endpoint, e))?;

        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.http.get(&url).header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::transport(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::parse(endpoint, e))
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn fetch_markets(&self) -> Result<Vec<MarketCoin>, FetchError> {
        let endpoint = format!(
            "/coins/markets?vs_currency=usd&order=market_cap_desc&per_page={}&page=1&sparkline=true&price_change_percentage=24h",
            config::TOP_COINS_COUNT
        );
        self.get_json(&endpoint).await
    }

    async fn fetch_market_chart(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<MarketChart, FetchError> {
        let endpoint = format!(
            "/coins/{}/market_chart?vs_currency=usd&days={}",
            coin_id, days
        );
        self.get_json(&endpoint).await
    }

    async fn fetch_global(&self) -> Result<GlobalData, FetchError> {
        let response: GlobalResponse = self.get_json("/global").await?;
        Ok(response.data)
    }

    async fn fetch_trending(&self) -> Result<TrendingResponse, FetchError> {
        self.get_json("/search/trending").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_coin_with_null_supplies_converts_to_zeroes() {
        let raw = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://img/btc.png",
            "market_cap_rank": 1,
            "current_price": 65000.5,
            "price_change_percentage_24h": -1.2,
            "market_cap": 1.2e12,
            "total_volume": 3.4e10,
            "circulating_supply": 19700000.0,
            "total_supply": null,
            "max_supply": null,
            "ath": 73000.0,
            "ath_change_percentage": -10.9,
            "ath_date": "2024-03-14T07:10:36.635Z",
            "sparkline_in_7d": {"price": [64000.0, 64500.0, 65000.0]}
        }"#;

        let coin: MarketCoin = serde_json::from_str(raw).unwrap();
        let snapshot = coin.into_snapshot();

        assert_eq!(snapshot.id, "bitcoin");
        assert_eq!(snapshot.rank, 1);
        assert_eq!(snapshot.total_supply, 0.0);
        assert_eq!(snapshot.max_supply, 0.0);
        assert_eq!(snapshot.sparkline_7d.len(), 3);
        assert!(snapshot.history.is_empty());
    }

    #[test]
    fn market_chart_points_convert_ms_timestamps() {
        let raw = r#"{"prices": [[1700000000000.0, 42000.0], [1700000300000.0, 42100.0]]}"#;
        let chart: MarketChart = serde_json::from_str(raw).unwrap();
        let points = chart.into_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].time, 1_700_000_000_000);
        assert_eq!(points[1].price, 42_100.0);
    }

    #[test]
    fn global_data_picks_usd_and_btc_entries() {
        let raw = r#"{
            "total_market_cap": {"usd": 2.5e12, "eur": 2.3e12},
            "total_volume": {"usd": 9.0e10},
            "market_cap_percentage": {"btc": 52.3, "eth": 17.1},
            "active_cryptocurrencies": 10234,
            "market_cap_change_percentage_24h_usd": 1.8
        }"#;

        let data: GlobalData = serde_json::from_str(raw).unwrap();
        let stats = data.into_stats();
        assert_eq!(stats.total_market_cap, 2.5e12);
        assert_eq!(stats.btc_dominance, 52.3);
        assert_eq!(stats.active_cryptocurrencies, 10234);
    }

    #[test]
    fn trending_response_tolerates_missing_fields() {
        let raw = r#"{
            "coins": [{"item": {"id": "pepe", "name": "Pepe", "symbol": "PEPE", "thumb": ""}}],
            "categories": [{"name": "Memes"}, {"name": "AI"}]
        }"#;

        let trending: TrendingResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(trending.coins.len(), 1);
        assert_eq!(trending.coins[0].item.market_cap_rank, None);
        assert_eq!(trending.categories[1].name, "AI");
    }
}

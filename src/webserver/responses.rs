//! Wire payloads and response helpers
//!
//! Payload field names are camelCase to match what the dashboard frontend
//! consumes. Historical data is keyed by period label and only included on
//! the single-coin endpoint.

use crate::cache::{CoinSnapshot, GlobalStats, PricePoint, TrendingCategory, TrendingCoin};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPayload {
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
    pub sparkline_data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical_data: Option<BTreeMap<&'static str, Vec<PricePoint>>>,
}

impl CoinPayload {
    pub fn from_snapshot(coin: CoinSnapshot, include_history: bool) -> Self {
        let historical_data = include_history.then(|| {
            coin.history
                .into_iter()
                .map(|(period, series)| (period.label(), series))
                .collect()
        });

        Self {
            id: coin.id,
            rank: coin.rank,
            name: coin.name,
            symbol: coin.symbol,
            logo: coin.logo,
            price: coin.price,
            change_24h: coin.change_24h,
            market_cap: coin.market_cap,
            volume_24h: coin.volume_24h,
            circulating_supply: coin.circulating_supply,
            total_supply: coin.total_supply,
            max_supply: coin.max_supply,
            ath: coin.ath,
            ath_change_percentage: coin.ath_change_percentage,
            ath_date: coin.ath_date,
            sparkline_data: coin.sparkline_7d,
            historical_data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalPayload {
    pub total_market_cap: f64,
    pub total_volume: f64,
    pub btc_dominance: f64,
    pub active_cryptocurrencies: i64,
    pub market_cap_change_24h: f64,
}

impl From<GlobalStats> for GlobalPayload {
    fn from(stats: GlobalStats) -> Self {
        Self {
            total_market_cap: stats.total_market_cap,
            total_volume: stats.total_volume,
            btc_dominance: stats.btc_dominance,
            active_cryptocurrencies: stats.active_cryptocurrencies,
            market_cap_change_24h: stats.market_cap_change_24h,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendingPayload {
    pub coins: Vec<TrendingCoinPayload>,
    pub categories: Vec<TrendingCategoryPayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendingCoinPayload {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub logo: String,
    pub rank: u32,
}

impl From<TrendingCoin> for TrendingCoinPayload {
    fn from(coin: TrendingCoin) -> Self {
        Self {
            id: coin.id,
            name: coin.name,
            symbol: coin.symbol,
            logo: coin.logo,
            rank: coin.rank,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendingCategoryPayload {
    pub name: String,
    pub trend: String,
}

impl From<TrendingCategory> for TrendingCategoryPayload {
    fn from(category: TrendingCategory) -> Self {
        Self {
            name: category.name,
            trend: category.trend,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthPayload {
    pub status: &'static str,
    pub coins_loaded: usize,
    pub uptime_seconds: u64,
}

pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// 503 while bootstrap has not completed
pub fn not_ready_response() -> Response {
    error_response(
        StatusCode::SERVICE_UNAVAILABLE,
        "Server is still loading data...",
    )
}

//! HTTP query boundary over the market cache
//!
//! Pure read path: every handler takes a point-in-time copy of cached data
//! under the cache lock and serializes it. All data endpoints refuse with
//! 503 until bootstrap has completed; /health always answers.

use crate::logger::{self, LogTag};
use crate::webserver::responses::{
    error_response, not_ready_response, success_response, CoinPayload, GlobalPayload,
    HealthPayload, TrendingPayload,
};
use crate::webserver::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/coins", get(list_coins))
        .route("/api/coin/:id", get(get_coin))
        .route("/api/global", get(get_global))
        .route("/api/trending", get(get_trending))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /api/coins - all tracked coins, current fields only
async fn list_coins(State(state): State<Arc<AppState>>) -> Response {
    if !state.cache.is_ready() {
        return not_ready_response();
    }

    let coins: Vec<CoinPayload> = state
        .cache
        .coins()
        .into_iter()
        .map(|coin| CoinPayload::from_snapshot(coin, false))
        .collect();

    success_response(coins)
}

/// GET /api/coin/:id - one coin with its full historical map
async fn get_coin(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    if !state.cache.is_ready() {
        return not_ready_response();
    }

    match state.cache.coin(&id) {
        Some(coin) => success_response(CoinPayload::from_snapshot(coin, true)),
        None => {
            logger::debug(LogTag::Webserver, &format!("Unknown coin requested: {}", id));
            error_response(StatusCode::NOT_FOUND, "Coin not found")
        }
    }
}

/// GET /api/global - market-wide aggregates
async fn get_global(State(state): State<Arc<AppState>>) -> Response {
    if !state.cache.is_ready() {
        return not_ready_response();
    }

    success_response(GlobalPayload::from(state.cache.global()))
}

/// GET /api/trending - trending coins and categories
async fn get_trending(State(state): State<Arc<AppState>>) -> Response {
    if !state.cache.is_ready() {
        return not_ready_response();
    }

    let (coins, categories) = state.cache.trending();
    success_response(TrendingPayload {
        coins: coins.into_iter().map(Into::into).collect(),
        categories: categories.into_iter().map(Into::into).collect(),
    })
}

/// GET /health - liveness, served in every state
async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    success_response(HealthPayload {
        status: if state.cache.is_ready() {
            "ready"
        } else {
            "loading"
        },
        coins_loaded: state.cache.coin_count(),
        uptime_seconds: state.uptime_seconds(),
    })
}

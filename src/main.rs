use std::sync::Arc;

use cryptolizard::{
    bootstrap,
    cache::MarketCache,
    coingecko::{CoinGeckoClient, MarketDataSource},
    logger::{self, LogTag},
    scheduler, webserver,
};

/// Main entry point for the CryptoLizard market data server
///
/// Startup order:
/// 1. Bootstrap sequencer runs once in the background (list, history,
///    trending, global), then flips the readiness flag
/// 2. Refresh scheduler waits for readiness, then ticks forever
/// 3. The webserver starts immediately and answers 503 until ready
#[tokio::main]
async fn main() {
    logger::init();
    logger::info(LogTag::System, "🦎 CryptoLizard server starting up...");

    let client = match CoinGeckoClient::new() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            logger::error(LogTag::System, &format!("❌ {}", e));
            std::process::exit(1);
        }
    };
    let cache = Arc::new(MarketCache::new());

    {
        let source: Arc<dyn MarketDataSource> = client.clone();
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            if let Err(e) = bootstrap::run(source, cache).await {
                // no usable dataset will ever exist; fail the process
                logger::error(LogTag::Bootstrap, &format!("❌ Bootstrap failed: {:#}", e));
                std::process::exit(1);
            }
        });
    }

    {
        let source: Arc<dyn MarketDataSource> = client;
        let cache = Arc::clone(&cache);
        tokio::spawn(async move {
            scheduler::run(source, cache).await;
        });
    }

    if let Err(e) = webserver::start_server(cache).await {
        logger::error(LogTag::Webserver, &format!("❌ {}", e));
        std::process::exit(1);
    }
}

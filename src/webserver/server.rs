/// Axum webserver lifecycle
///
/// Binds the configured port and serves the query API until the process
/// exits. The server starts before bootstrap finishes; handlers answer 503
/// until the cache is ready.
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::cache::MarketCache;
use crate::config;
use crate::logger::{self, LogTag};
use crate::webserver::{routes, state::AppState};

/// Start the webserver
///
/// This function blocks until the server is shut down.
pub async fn start_server(cache: Arc<MarketCache>) -> Result<(), String> {
    let port = config::server_port();
    let state = Arc::new(AppState::new(cache));
    let app = routes::create_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", port)
        .parse()
        .map_err(|e| format!("Invalid bind address: {}", e))?;

    let listener = TcpListener::bind(&addr).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::AddrInUse => format!(
            "Failed to bind to {}: address already in use. \
             Another instance may be running, or set PORT to a free port.",
            addr
        ),
        std::io::ErrorKind::PermissionDenied => format!(
            "Failed to bind to {}: permission denied. \
             Ports below 1024 need elevated privileges; set PORT above 1024.",
            addr
        ),
        _ => format!("Failed to bind to {}: {}", addr, e),
    })?;

    logger::info(
        LogTag::Webserver,
        &format!("🌐 Webserver listening on http://{}", addr),
    );
    logger::info(
        LogTag::Webserver,
        &format!("📊 API endpoints available at http://{}/api", addr),
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

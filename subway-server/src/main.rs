use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use subway_server::config::ServerConfig;
use subway_server::topology::Network;
use subway_server::web::{AppState, create_router};

const DEFAULT_LOG_FILTER: &str = "subway_server=info,tower_http=info";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    let network = match &config.network_data {
        Some(path) => Network::load(path).expect("Failed to load network data"),
        None => Network::embedded().expect("Embedded network data is invalid"),
    };
    info!(
        lines = network.lines().len(),
        stations = network.station_count(),
        "loaded network"
    );

    let state = AppState::from_config(&config, Arc::new(network))
        .expect("Failed to create provider clients");
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    info!(addr = %config.bind_addr, "subway server listening");
    info!("  GET /health");
    info!("  GET /api/stations/search?q=");
    info!("  GET /api/route?from=&to=[&line=]");
    info!("  GET /api/arrivals?station=[&line=&direction=&destination=]");
    info!("  GET /api/route/arrivals?from=&to=[&line=&direction=&destination=&limit=]");
    info!("  GET /api/timetable?station=[&line=&direction=&day=&upcoming=]");

    axum::serve(listener, app).await.expect("Server error");
}

//! useragg API server entry point.

use std::error::Error;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use useragg_api::config::ApiConfig;
use useragg_api::routes;
use useragg_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting useragg API server");

    // Read configuration from environment.
    let config = ApiConfig::from_env()?;

    // Build application state.
    let app_state = AppState::from_config(&config)?;
    tracing::info!(
        timeout = ?config.aggregate_timeout,
        seed = ?config.seed_path,
        "aggregator ready"
    );

    // Build router.
    let app = routes::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

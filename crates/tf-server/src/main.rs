//! Profile Server - HTTP front end for terrain-following profile synthesis

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tf_server::api;
use tf_server::config::Config;
use tf_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("tf_server=debug".parse()?)
            .add_directive("tf_core=info".parse()?))
        .init();

    tracing::info!("Starting profile server...");

    let config = Config::from_env();
    let port = config.server_port;
    tracing::info!(
        step_m = config.default_profile.step_m,
        speed_mps = config.default_profile.envelope.speed_mps,
        max_samples = config.max_samples,
        "Loaded configuration"
    );
    let state = Arc::new(AppState::new(config.clone()));

    // Build the app
    let app = api::routes(&config)
        .with_state(state) // Inject state into all routes
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use blotto_backend::api;
use blotto_backend::config::Config;
use blotto_backend::engine::server::GameServer;
use blotto_backend::metrics;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load();
    metrics::register_metrics();

    let game_server = match GameServer::new(
        config.default_troops,
        config.default_fields,
        config.limits(),
    ) {
        Ok(server) => Arc::new(server),
        Err(e) => {
            tracing::error!("Invalid startup game: {e}");
            std::process::exit(1);
        }
    };

    if let Some(dir) = &config.static_dir {
        tracing::info!("Serving frontend from {}", dir.display());
    }

    let app = api::router(game_server, config.static_dir.clone())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to port {}: {e}", config.port));

    tracing::info!("Blotto backend listening on port {}", config.port);
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

use anyhow::{Context, Result};
use rental_api::{app, config, middleware};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = config.storage.backend.as_str(),
        environment = %config.environment,
        "Starting rental listing API"
    );

    let storage = persistence::open_storage(&config.storage, &config.database, config.is_test());
    storage
        .reload()
        .await
        .context("Failed to load storage")?;

    let addr = config.socket_addr().context("Invalid server address")?;
    let app = app::create_app(config, storage.clone());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = storage.close().await {
        warn!(error = %e, "Storage did not close cleanly");
    }
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

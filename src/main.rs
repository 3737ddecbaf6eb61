use std::sync::Arc;

use product_recs_api::{
    config::Config,
    routes::{create_router, AppState},
    services::{Catalog, GroqClient},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "product_recs_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing API key or catalog file stops startup here
    let config = Config::from_env()?;
    tracing::info!(config = ?config, "Configuration loaded");

    let catalog = Catalog::load(&config.data_path)?;
    let model = GroqClient::new(config.model_settings())?;

    let state = Arc::new(AppState::new(catalog, Arc::new(model)));
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}

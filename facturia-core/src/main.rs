use dotenv::dotenv;
use facturia_core::{api::HttpApiClient, create_router, AppState, DashboardConfig};
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(LevelFilter::INFO.into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    info!("Starting Facturia dashboard...");

    let config = DashboardConfig::from_env()?;
    let client = HttpApiClient::from_config(&config)?;
    info!("Invoice backend at {}", client.base_url());

    let bind_address = config.bind_address();
    let state = AppState::new(config, Arc::new(client));

    let workspaces = state.workspaces.clone();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", bind_address, e))?;

    info!("Server listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    workspaces.stop().await;

    Ok(())
}

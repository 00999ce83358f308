use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use hindemit_server::config::ServerConfig;
use hindemit_server::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ServerConfig::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY is not set; chat and suggestions are disabled");
    }

    let state = AppState::from_config(&config)?;
    let app = hindemit_server::app(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

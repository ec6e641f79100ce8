pub mod api;
pub mod backend;
pub mod config;
pub mod core_state;
pub mod dispatch;
pub mod models;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Run the dispatch service until Ctrl-C.
///
/// Startup order: tracing → config → queues → HTTP server. Shutdown runs in
/// reverse: the server stops accepting requests first, then both queues are
/// torn down and their pending entries discarded.
pub async fn run() -> Result<(), String> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let app_config = config::AppConfig::from_env().map_err(|e| e.to_string())?;
    let bind_addr = app_config.bind_addr;

    let core = Arc::new(core_state::CoreState::new(app_config).map_err(|e| e.to_string())?);

    let server = api::start_server(core.clone(), bind_addr).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
    }

    tracing::info!("Shutting down");
    server.stop().await;
    core.shutdown();
    Ok(())
}

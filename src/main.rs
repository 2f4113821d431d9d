//! Wallet Shell - screen lock and settings service
//! 
//! Receives app lifecycle signals from the host shell over HTTP and keeps
//! the lock window and main window in step with the autolock timeout.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use wallet_shell::{
    config::Config,
    create_router,
    services::{FileSettingsStore, MemorySettingsStore, SettingsStore, SystemClock},
    shutdown_signal,
    state::AppState,
    tasks::unlock_listener_task,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let config = Config::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(format!("wallet_shell={},tower_http=info", config.log_level()))
        .init();

    info!("Starting wallet-shell server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, network={}",
          config.host, config.port, config.network);

    let settings: Arc<dyn SettingsStore> = match &config.settings {
        Some(path) => {
            let store = FileSettingsStore::new(path);
            if let Err(e) = store.load() {
                warn!("Settings file {} unusable, using defaults: {}", path.display(), e);
            }
            info!("Settings file: {}", path.display());
            Arc::new(store)
        }
        None => {
            info!("No settings file, keeping settings in memory");
            Arc::new(MemorySettingsStore::default())
        }
    };
    info!("Autolock timeout: {}s", settings.timeout().as_secs());

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.network,
        settings,
        Arc::new(SystemClock),
    ));
    state
        .start_observing(config.initial_visibility())
        .map_err(anyhow::Error::msg)?;

    // Keep the shell windows in step with the locker
    let listener_state = Arc::clone(&state);
    tokio::spawn(async move {
        unlock_listener_task(listener_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /lifecycle/:event - became-active | will-resign-active | will-enter-foreground | did-enter-background");
    info!("  POST /unlock           - Unlock after re-authentication");
    info!("  GET  /lock             - Whether the lock screen is needed");
    info!("  GET  /status           - Lock and shell status");
    info!("  GET  /health           - Health check");
    info!("  GET|PUT /settings      - Stored wallet settings");
    info!("  POST /settings/menu    - Settings menu for a wallet mode");
    info!("  POST /convert          - Amount conversion");
    info!("  POST /two-factor/limit - Two-factor threshold request");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if let Err(e) = state.stop_observing() {
        error!("Failed to stop screen locker: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}

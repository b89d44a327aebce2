//! Countdown Timer - a single start/pause/reset countdown
//! 
//! This is the main entry point: it owns the one timer engine for the life of
//! the process and serves the HTTP control surface in front of it.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_timer::{
    config::Config,
    engine::TimerEngine,
    state::AppState,
    api::create_router,
    tasks::state_log_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, duration={}s, tick={}ms",
          config.host, config.port, config.duration, config.tick_ms);

    let engine_config = config.engine_config().map_err(anyhow::Error::msg)?;
    let engine = TimerEngine::spawn(engine_config);

    // Log every snapshot the engine emits
    tokio::spawn(state_log_task(engine.subscribe()));

    let state = Arc::new(AppState::new(engine.clone(), config.port, config.host.clone()));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start        - Start or resume the countdown");
    info!("  POST /pause        - Pause the countdown");
    info!("  POST /reset        - Reset to the initial duration");
    info!("  POST /event/:event - Send start, pause or reset by name");
    info!("  GET  /status       - Current timer state");
    info!("  GET  /health       - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    engine.shutdown();
    engine.join().await;

    info!("Server shutdown complete");
    Ok(())
}

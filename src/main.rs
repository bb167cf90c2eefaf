//! Clepsydra - A countdown timer with a drag-to-scrub control
//!
//! Composition root: builds the timer core, its collaborators and the HTTP
//! surface, then runs until a shutdown signal arrives.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use clepsydra::{
    api::create_router,
    config::Config,
    services::{check_player_available, AlarmPlayer, CommandAlarmPlayer, TerminalBellPlayer},
    state::{AppState, TimerCore},
    tasks::spawn_timer_loop,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("clepsydra={},tower_http=info", config.log_level()))
        .init();

    config.validate()?;

    info!("Starting clepsydra v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, total={}s, presets={:?}min, tick={}ms",
        config.host, config.port, config.total_seconds, config.presets, config.tick_ms
    );

    // The alarm is optional: a missing player only degrades to a logged failure on expiry
    let alarm: Arc<dyn AlarmPlayer> = match &config.sound {
        Some(sound) => {
            if let Err(e) = check_player_available(&config.player).await {
                warn!("{}", e);
            }
            Arc::new(CommandAlarmPlayer::new(config.player.clone(), sound.clone()))
        }
        None => {
            info!("No alarm sound configured, using the terminal bell");
            Arc::new(TerminalBellPlayer)
        }
    };

    let presets = config.preset_selector();
    let mut core = TimerCore::new(config.total_duration()?, presets.clone(), config.unit_interval());
    if let Some(initial) = config.initial_remaining() {
        core.on_set_duration(initial);
    }

    // Start the timer event loop
    let timer = spawn_timer_loop(core, alarm);
    let state = Arc::new(AppState::new(config.port, config.host.clone(), presets, &timer));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start-stop    - Toggle the countdown");
    info!("  POST /start         - Start the countdown");
    info!("  POST /stop          - Stop the countdown");
    info!("  POST /preset/:index - Jump to a preset");
    info!("  POST /duration      - Set remaining seconds");
    info!("  POST /drag/begin    - Scrubber pointer down");
    info!("  POST /drag/move     - Scrubber pointer move");
    info!("  POST /drag/end      - Scrubber pointer up");
    info!("  GET  /status        - Timer snapshot (?track_width=px)");
    info!("  GET  /presets       - Preset list");
    info!("  GET  /health        - Health check");

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

    state.request_shutdown().await;
    if let Err(e) = timer.task.await {
        warn!("Timer loop ended abnormally: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}

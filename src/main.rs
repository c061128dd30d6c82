//! Stage Timer - A dual countdown timer server for presentations
//!
//! This is the main entry point for the stage-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use stage_timer::{
    api::create_router,
    config::Config,
    services::{AudioBackend, AudioOutput},
    state::{AppState, TimerDefaults},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("stage_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting stage-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, presentation={}min, qa={}min, ringtone={}, poll={}ms",
        config.host,
        config.port,
        config.presentation_minutes,
        config.qa_minutes,
        config.ringtone,
        config.poll_ms
    );

    // One audio output for the whole process, shared by both timers
    let audio = AudioOutput::shared(AudioBackend::from_player(config.player.clone()));

    let defaults = TimerDefaults {
        presentation_seconds: config.presentation_seconds(),
        qa_seconds: config.qa_seconds(),
        ringtone: config.ringtone,
        poll_interval: config.poll_interval(),
    };
    let state = Arc::new(AppState::new(config.port, config.host.clone(), defaults, audio));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints (phase = presentation | qa):");
    info!("  GET  /timers                     - Both timers");
    info!("  GET  /timers/:phase              - One timer");
    info!("  GET  /timers/:phase/events       - Snapshot stream (SSE)");
    info!("  POST /timers/:phase/start        - Start or resume");
    info!("  POST /timers/:phase/pause        - Pause");
    info!("  POST /timers/:phase/reset        - Reset to duration");
    info!("  POST /timers/:phase/stop-alarm   - Silence the alarm");
    info!("  POST /timers/:phase/toggle       - Main button (stop alarm, pause or start)");
    info!("  POST /timers/:phase/adjust       - {{\"seconds\": n}}");
    info!("  POST /timers/:phase/duration     - {{\"seconds\": n}}");
    info!("  POST /timers/:phase/ringtone     - {{\"ringtone\": name}}");
    info!("  PUT  /timers/:phase/settings     - {{\"minutes\": n, \"ringtone\": name}}");
    info!("  POST /ringtones/:ringtone/preview - Play one tone");
    info!("  GET  /presets, /status, /health");

    // Setup graceful shutdown
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

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}

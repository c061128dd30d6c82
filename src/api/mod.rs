//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(timers_handler))
        .route("/timers/:phase", get(timer_handler))
        .route("/timers/:phase/events", get(events_handler))
        .route("/timers/:phase/start", post(start_handler))
        .route("/timers/:phase/pause", post(pause_handler))
        .route("/timers/:phase/reset", post(reset_handler))
        .route("/timers/:phase/stop-alarm", post(stop_alarm_handler))
        .route("/timers/:phase/toggle", post(toggle_handler))
        .route("/timers/:phase/adjust", post(adjust_handler))
        .route("/timers/:phase/duration", post(duration_handler))
        .route("/timers/:phase/ringtone", post(ringtone_handler))
        .route("/timers/:phase/settings", put(settings_handler))
        .route("/ringtones/:ringtone/preview", post(preview_handler))
        .route("/presets", get(presets_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

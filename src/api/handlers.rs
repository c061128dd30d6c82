//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use chrono::Utc;
use futures::stream::{self, Stream};
use tracing::{debug, info, warn};

use super::responses::{
    ApiResponse, HealthResponse, PresetsResponse, PreviewResponse, RingtoneRequest,
    SecondsRequest, SettingsRequest, StatusResponse, TimerView, TimersResponse,
};
use crate::state::{AppState, Phase, Ringtone, TimerHandle, TimerSnapshot};

type ApiResult<T> = Result<Json<T>, StatusCode>;

fn resolve_phase(raw: &str) -> Result<Phase, StatusCode> {
    raw.parse().map_err(|e| {
        warn!("Rejected request: {}", e);
        StatusCode::NOT_FOUND
    })
}

/// Run one engine command and wrap the resulting snapshot
fn run_command<F>(
    state: &AppState,
    raw_phase: &str,
    action: &str,
    message: &str,
    command: F,
) -> ApiResult<ApiResponse>
where
    F: FnOnce(&TimerHandle) -> TimerSnapshot,
{
    let phase = resolve_phase(raw_phase)?;
    let snapshot = command(state.timer(phase));
    state.record_action(Some(phase), action);
    Ok(Json(ApiResponse::ok(
        format!("{} timer {}", phase.title(), message),
        snapshot,
    )))
}

/// Handle GET /timers - Both timers
pub async fn timers_handler(State(state): State<Arc<AppState>>) -> Json<TimersResponse> {
    Json(TimersResponse {
        timers: state.timers().map(|t| TimerView::from(t.snapshot())).collect(),
    })
}

/// Handle GET /timers/:phase - One timer
pub async fn timer_handler(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
) -> ApiResult<TimerView> {
    let phase = resolve_phase(&phase)?;
    Ok(Json(state.timer(phase).snapshot().into()))
}

/// Handle POST /timers/:phase/start
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
) -> ApiResult<ApiResponse> {
    run_command(&state, &phase, "start", "started", TimerHandle::start)
}

/// Handle POST /timers/:phase/pause
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
) -> ApiResult<ApiResponse> {
    run_command(&state, &phase, "pause", "paused", TimerHandle::pause)
}

/// Handle POST /timers/:phase/reset
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
) -> ApiResult<ApiResponse> {
    run_command(&state, &phase, "reset", "reset", TimerHandle::reset)
}

/// Handle POST /timers/:phase/stop-alarm
pub async fn stop_alarm_handler(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
) -> ApiResult<ApiResponse> {
    run_command(&state, &phase, "stop-alarm", "alarm stopped", TimerHandle::stop_alarm)
}

/// Handle POST /timers/:phase/toggle - Main button: stop alarm, pause or start
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
) -> ApiResult<ApiResponse> {
    run_command(&state, &phase, "toggle", "toggled", TimerHandle::toggle)
}

/// Handle POST /timers/:phase/adjust - Shift remaining time and duration
pub async fn adjust_handler(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
    Json(body): Json<SecondsRequest>,
) -> ApiResult<ApiResponse> {
    let message = format!("adjusted by {}s", body.seconds);
    run_command(&state, &phase, "adjust", &message, |timer| {
        timer.adjust(body.seconds)
    })
}

/// Handle POST /timers/:phase/duration - Reconfigure and return to idle
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
    Json(body): Json<SecondsRequest>,
) -> ApiResult<ApiResponse> {
    run_command(&state, &phase, "duration", "duration set", |timer| {
        timer.set_duration(body.seconds)
    })
}

/// Handle POST /timers/:phase/ringtone
pub async fn ringtone_handler(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
    Json(body): Json<RingtoneRequest>,
) -> ApiResult<ApiResponse> {
    let message = format!("ringtone set to {}", body.ringtone);
    run_command(&state, &phase, "ringtone", &message, |timer| {
        timer.set_ringtone(body.ringtone)
    })
}

/// Handle PUT /timers/:phase/settings - Save duration and ringtone together
pub async fn settings_handler(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
    Json(body): Json<SettingsRequest>,
) -> ApiResult<ApiResponse> {
    run_command(&state, &phase, "settings", "settings saved", |timer| {
        timer.apply_settings(body.minutes, body.ringtone)
    })
}

/// Handle GET /timers/:phase/events - Server-sent stream of snapshots
///
/// The current snapshot is sent first, then one event per visible change.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    let phase = resolve_phase(&phase)?;
    let updates = state.timer(phase).subscribe();
    info!("{} event stream opened", phase);

    let events = stream::unfold((updates, true), |(mut updates, first)| async move {
        if !first && updates.changed().await.is_err() {
            return None;
        }
        let snapshot = *updates.borrow_and_update();
        let event = Event::default()
            .event("snapshot")
            .json_data(TimerView::from(snapshot))
            .ok()?;
        Some((Ok(event), (updates, false)))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Handle POST /ringtones/:ringtone/preview - Play one tone
pub async fn preview_handler(
    State(state): State<Arc<AppState>>,
    Path(ringtone): Path<String>,
) -> ApiResult<PreviewResponse> {
    let ringtone: Ringtone = ringtone.parse().map_err(|e| {
        warn!("Rejected preview: {}", e);
        StatusCode::NOT_FOUND
    })?;

    // Any timer can audition; they share the audio output
    state.timer(Phase::Presentation).preview_ringtone(ringtone);
    state.record_action(None, "preview");
    debug!("Previewed {} ringtone", ringtone);

    Ok(Json(PreviewResponse {
        status: "ok".to_string(),
        ringtone,
        timestamp: Utc::now(),
    }))
}

/// Handle GET /presets
pub async fn presets_handler() -> Json<PresetsResponse> {
    Json(PresetsResponse::standard())
}

/// Handle GET /status - Server metadata and both timers
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timers: state.timers().map(|t| TimerView::from(t.snapshot())).collect(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

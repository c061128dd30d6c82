use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use futures::StreamExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use stage_timer::{
    create_router,
    services::RecordingTone,
    state::{AppState, Phase, Ringtone, TimerDefaults, TimerStatus},
};

fn app() -> (Router, Arc<AppState>, Arc<RecordingTone>) {
    let tone = Arc::new(RecordingTone::new());
    let state = Arc::new(AppState::new(
        20554,
        "127.0.0.1".to_string(),
        TimerDefaults::default(),
        tone.clone(),
    ));
    (create_router(Arc::clone(&state)), state, tone)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let (router, _, _) = app();
    let (status, body) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn lists_both_timers_with_defaults() {
    let (router, _, _) = app();
    let (status, body) = send(&router, Method::GET, "/timers", None).await;
    assert_eq!(status, StatusCode::OK);

    let timers = body["timers"].as_array().unwrap();
    assert_eq!(timers.len(), 2);
    assert_eq!(timers[0]["phase"], "presentation");
    assert_eq!(timers[0]["display"], "15:00");
    assert_eq!(timers[1]["phase"], "qa");
    assert_eq!(timers[1]["remaining"], 300);
    assert_eq!(timers[1]["status"], "idle");
}

#[tokio::test]
async fn start_and_pause_round_trip() {
    let (router, state, _) = app();

    let (status, body) = send(&router, Method::POST, "/timers/qa/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "running");
    assert_eq!(state.timer(Phase::Qa).snapshot().status, TimerStatus::Running);
    assert_eq!(state.timer(Phase::Presentation).snapshot().status, TimerStatus::Idle);

    let (_, body) = send(&router, Method::POST, "/timers/qa/pause", None).await;
    assert_eq!(body["timer"]["status"], "paused");
    assert_eq!(body["timer"]["remaining"], 300);

    let (_, body) = send(&router, Method::GET, "/status", None).await;
    assert_eq!(body["last_action"], "qa:pause");
}

#[tokio::test]
async fn adjust_accepts_the_ppt_alias() {
    let (router, _, _) = app();
    let (status, body) = send(
        &router,
        Method::POST,
        "/timers/ppt/adjust",
        Some(json!({ "seconds": 60 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["remaining"], 960);
    assert_eq!(body["timer"]["duration"], 960);
}

#[tokio::test]
async fn adjusting_a_running_timer_past_zero_rings() {
    let (router, state, _) = app();
    send(&router, Method::POST, "/timers/qa/start", None).await;
    let (_, body) = send(
        &router,
        Method::POST,
        "/timers/qa/adjust",
        Some(json!({ "seconds": -600 })),
    )
    .await;

    assert_eq!(body["timer"]["status"], "completed");
    assert_eq!(body["timer"]["is_ringing"], true);

    let (_, body) = send(&router, Method::POST, "/timers/qa/stop-alarm", None).await;
    assert_eq!(body["timer"]["is_ringing"], false);
    assert_eq!(body["timer"]["status"], "completed");
    assert!(!state.timer(Phase::Qa).is_alarm_armed());
}

#[tokio::test]
async fn settings_floor_zero_minutes() {
    let (router, _, _) = app();
    let (status, body) = send(
        &router,
        Method::PUT,
        "/timers/presentation/settings",
        Some(json!({ "minutes": 0, "ringtone": "none" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["duration"], 60);
    assert_eq!(body["timer"]["ringtone"], "none");
    assert_eq!(body["timer"]["status"], "idle");
}

#[tokio::test]
async fn duration_and_ringtone_endpoints() {
    let (router, state, _) = app();
    let (_, body) = send(
        &router,
        Method::POST,
        "/timers/qa/duration",
        Some(json!({ "seconds": 420 })),
    )
    .await;
    assert_eq!(body["timer"]["remaining"], 420);

    let (status, _) = send(
        &router,
        Method::POST,
        "/timers/qa/ringtone",
        Some(json!({ "ringtone": "digital" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.timer(Phase::Qa).snapshot().ringtone, Ringtone::Digital);

    let (_, body) = send(&router, Method::POST, "/timers/qa/reset", None).await;
    assert_eq!(body["timer"]["remaining"], 420);
}

#[tokio::test]
async fn preview_plays_one_tone_without_touching_timers() {
    let (router, state, tone) = app();
    let (status, body) = send(&router, Method::POST, "/ringtones/alarm/preview", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ringtone"], "alarm");
    assert_eq!(tone.played(), vec![Ringtone::Alarm]);
    assert!(state.timers().all(|t| !t.snapshot().is_ringing));
}

#[tokio::test]
async fn unknown_names_are_not_found() {
    let (router, _, _) = app();
    let (status, _) = send(&router, Method::POST, "/timers/keynote/start", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, Method::POST, "/ringtones/gong/preview", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_bodies_are_rejected() {
    let (router, _, _) = app();
    let (status, _) = send(
        &router,
        Method::POST,
        "/timers/qa/adjust",
        Some(json!({ "seconds": "a lot" })),
    )
    .await;
    assert!(status.is_client_error());

    let (status, _) = send(
        &router,
        Method::POST,
        "/timers/qa/ringtone",
        Some(json!({ "ringtone": "gong" })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn presets_list_minutes_and_ringtones() {
    let (router, _, _) = app();
    let (_, body) = send(&router, Method::GET, "/presets", None).await;
    assert_eq!(body["minutes"], json!([3, 5, 10, 15, 20, 30, 45, 60]));
    assert_eq!(body["ringtones"], json!(["bell", "alarm", "digital", "none"]));
}

#[tokio::test]
async fn toggle_walks_through_the_main_button_states() {
    let (router, state, _) = app();
    let (status, body) = send(&router, Method::POST, "/timers/qa/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "running");

    let (_, body) = send(&router, Method::POST, "/timers/qa/toggle", None).await;
    assert_eq!(body["timer"]["status"], "paused");

    send(&router, Method::POST, "/timers/qa/start", None).await;
    send(&router, Method::POST, "/timers/qa/adjust", Some(json!({ "seconds": -600 }))).await;
    assert!(state.timer(Phase::Qa).snapshot().is_ringing);

    let (_, body) = send(&router, Method::POST, "/timers/qa/toggle", None).await;
    assert_eq!(body["timer"]["is_ringing"], false);
    assert_eq!(body["timer"]["status"], "completed");

    let (_, body) = send(&router, Method::GET, "/status", None).await;
    assert_eq!(body["last_action"], "qa:toggle");
}

#[tokio::test(start_paused = true)]
async fn event_stream_sends_current_snapshot_then_changes() {
    let (router, state, _) = app();
    let request = Request::builder()
        .uri("/timers/qa/events")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let mut frames = response.into_body().into_data_stream();
    let first = frames.next().await.unwrap().unwrap();
    let first = String::from_utf8(first.to_vec()).unwrap();
    assert!(first.starts_with("event: snapshot\n"));
    assert!(first.contains(r#""status":"idle""#));
    assert!(first.contains(r#""display":"05:00""#));

    state.timer(Phase::Qa).adjust(60);
    let second = frames.next().await.unwrap().unwrap();
    let second = String::from_utf8(second.to_vec()).unwrap();
    assert!(second.starts_with("event: snapshot\n"));
    assert!(second.contains(r#""remaining":360"#));
}

#[tokio::test]
async fn event_stream_for_unknown_phase_is_not_found() {
    let (router, _, _) = app();
    let (status, _) = send(&router, Method::GET, "/timers/keynote/events", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

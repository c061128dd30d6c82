//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{Ringtone, TimerSnapshot, TimerStatus},
    utils::{format_clock, progress_percent, WARNING_THRESHOLD_SECS},
};

/// Minute presets offered by the settings panel
pub const PRESET_MINUTES: [u64; 8] = [3, 5, 10, 15, 20, 30, 45, 60];

/// A timer snapshot plus the derived values a display needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    #[serde(flatten)]
    pub snapshot: TimerSnapshot,
    pub title: String,
    /// Remaining time as `MM:SS`
    pub display: String,
    /// Elapsed percentage of the duration
    pub progress: f64,
    /// Running with less than a minute left
    pub warning: bool,
}

impl From<TimerSnapshot> for TimerView {
    fn from(snapshot: TimerSnapshot) -> Self {
        Self {
            title: snapshot.phase.title().to_string(),
            display: format_clock(snapshot.remaining),
            progress: progress_percent(snapshot.duration, snapshot.remaining),
            warning: snapshot.status == TimerStatus::Running
                && snapshot.remaining < WARNING_THRESHOLD_SECS,
            snapshot,
        }
    }
}

/// Response structure for timer command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    pub fn ok(message: String, snapshot: TimerSnapshot) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            timer: snapshot.into(),
        }
    }
}

/// Both timers side by side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimersResponse {
    pub timers: Vec<TimerView>,
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timers: Vec<TimerView>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Settings choices a host can offer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetsResponse {
    pub minutes: Vec<u64>,
    pub ringtones: Vec<Ringtone>,
}

impl PresetsResponse {
    pub fn standard() -> Self {
        Self {
            minutes: PRESET_MINUTES.to_vec(),
            ringtones: Ringtone::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub status: String,
    pub ringtone: Ringtone,
    pub timestamp: DateTime<Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body for `adjust` and `duration`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SecondsRequest {
    pub seconds: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RingtoneRequest {
    pub ringtone: Ringtone,
}

/// Body for the settings panel save
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SettingsRequest {
    pub minutes: u64,
    pub ringtone: Ringtone,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Phase;

    fn snapshot(status: TimerStatus, remaining: u64, duration: u64) -> TimerSnapshot {
        TimerSnapshot {
            phase: Phase::Presentation,
            remaining,
            duration,
            status,
            ringtone: Ringtone::Bell,
            is_ringing: false,
        }
    }

    #[test]
    fn view_derives_display_fields() {
        let view = TimerView::from(snapshot(TimerStatus::Running, 45, 900));
        assert_eq!(view.display, "00:45");
        assert!(view.warning);
        assert_eq!(view.title, "Presentation");
        assert!((view.progress - 95.0).abs() < 1e-9);

        let view = TimerView::from(snapshot(TimerStatus::Paused, 45, 900));
        assert!(!view.warning);
    }

    #[test]
    fn view_flattens_snapshot_fields() {
        let json = serde_json::to_value(TimerView::from(snapshot(TimerStatus::Idle, 0, 0))).unwrap();
        assert_eq!(json["phase"], "presentation");
        assert_eq!(json["status"], "idle");
        assert_eq!(json["display"], "00:00");
        assert_eq!(json["progress"], 0.0);
    }
}

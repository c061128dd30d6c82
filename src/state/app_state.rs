//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use tracing::info;

use super::{Phase, Ringtone, TimerHandle};
use crate::services::{Clock, MonotonicClock, ToneSink};

/// Main application state: one independent timer per phase plus server metadata
#[derive(Debug)]
pub struct AppState {
    presentation: TimerHandle,
    qa: TimerHandle,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

/// Initial configuration of both timers
#[derive(Debug, Clone)]
pub struct TimerDefaults {
    pub presentation_seconds: u64,
    pub qa_seconds: u64,
    pub ringtone: Ringtone,
    pub poll_interval: Duration,
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            presentation_seconds: 15 * 60,
            qa_seconds: 5 * 60,
            ringtone: Ringtone::Bell,
            poll_interval: crate::tasks::DEFAULT_POLL_INTERVAL,
        }
    }
}

impl AppState {
    /// Create the state with a fresh monotonic clock per timer
    pub fn new(port: u16, host: String, defaults: TimerDefaults, tone: Arc<dyn ToneSink>) -> Self {
        Self::with_clocks(
            port,
            host,
            defaults,
            tone,
            Arc::new(MonotonicClock::new()),
            Arc::new(MonotonicClock::new()),
        )
    }

    /// Create the state with explicit clocks for the presentation and Q&A timers
    pub fn with_clocks(
        port: u16,
        host: String,
        defaults: TimerDefaults,
        tone: Arc<dyn ToneSink>,
        presentation_clock: Arc<dyn Clock>,
        qa_clock: Arc<dyn Clock>,
    ) -> Self {
        let build = |phase: Phase, seconds: u64, clock: Arc<dyn Clock>| {
            let handle = TimerHandle::new(
                phase,
                seconds,
                clock,
                Arc::clone(&tone),
                defaults.poll_interval,
            );
            handle.set_ringtone(defaults.ringtone);
            handle
        };

        Self {
            presentation: build(Phase::Presentation, defaults.presentation_seconds, presentation_clock),
            qa: build(Phase::Qa, defaults.qa_seconds, qa_clock),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// The timer for `phase`
    pub fn timer(&self, phase: Phase) -> &TimerHandle {
        match phase {
            Phase::Presentation => &self.presentation,
            Phase::Qa => &self.qa,
        }
    }

    pub fn timers(&self) -> impl Iterator<Item = &TimerHandle> {
        Phase::ALL.into_iter().map(|phase| self.timer(phase))
    }

    /// Remember the most recent command for the status endpoint
    pub fn record_action(&self, phase: Option<Phase>, action: &str) {
        let label = match phase {
            Some(phase) => format!("{}:{}", phase, action),
            None => action.to_string(),
        };
        info!("Action: {}", label);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(label);
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Cancel every background task of both timers
    pub fn shutdown(&self) {
        for timer in self.timers() {
            timer.shutdown();
        }
        info!("All timers shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::NullTone, state::TimerStatus};

    fn state() -> AppState {
        AppState::new(0, "127.0.0.1".into(), TimerDefaults::default(), Arc::new(NullTone))
    }

    #[test]
    fn phases_start_with_their_own_durations() {
        let state = state();
        assert_eq!(state.timer(Phase::Presentation).snapshot().duration, 900);
        assert_eq!(state.timer(Phase::Qa).snapshot().duration, 300);
        assert_eq!(state.timers().count(), 2);
    }

    #[test]
    fn phases_are_independent() {
        let state = state();
        state.timer(Phase::Qa).adjust(-60);
        state.timer(Phase::Qa).set_ringtone(Ringtone::None);

        let presentation = state.timer(Phase::Presentation).snapshot();
        assert_eq!(presentation.remaining, 900);
        assert_eq!(presentation.ringtone, Ringtone::Bell);
        assert_eq!(presentation.status, TimerStatus::Idle);
        assert_eq!(state.timer(Phase::Qa).snapshot().remaining, 240);
    }

    #[test]
    fn records_last_action() {
        let state = state();
        assert_eq!(state.get_last_action(), (None, None));

        state.record_action(Some(Phase::Qa), "reset");
        let (action, at) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("qa:reset"));
        assert!(at.is_some());
    }
}
